//! Machine-readable dumps of a computed partition.

use crate::domain::model::Sector;
use crate::utils::error::{InfographicError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRow {
    pub name: String,
    pub weight: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub span: f64,
    pub mid_angle: f64,
}

impl From<&Sector> for SectorRow {
    fn from(sector: &Sector) -> Self {
        Self {
            name: sector.name().to_string(),
            weight: sector.category.weight,
            start_angle: sector.start_angle,
            end_angle: sector.end_angle,
            span: sector.span(),
            mid_angle: sector.mid_angle(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub generated_at: DateTime<Utc>,
    pub total_weight: f64,
    pub sectors: Vec<SectorRow>,
}

impl LayoutReport {
    pub fn new(sectors: &[Sector]) -> Self {
        Self {
            generated_at: Utc::now(),
            total_weight: sectors.iter().map(|s| s.category.weight).sum(),
            sectors: sectors.iter().map(SectorRow::from).collect(),
        }
    }
}

pub fn sectors_to_json(sectors: &[Sector]) -> Result<String> {
    let report = LayoutReport::new(sectors);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn sectors_to_csv(sectors: &[Sector]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for sector in sectors {
        writer.serialize(SectorRow::from(sector))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InfographicError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| InfographicError::RenderError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::partition::partition_sectors;
    use crate::domain::model::{Category, Direction};

    fn sectors() -> Vec<Sector> {
        partition_sectors(
            &[Category::new("A", 3.0), Category::new("B", 1.0)],
            90.0,
            Direction::Clockwise,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_sector() {
        let csv = sectors_to_csv(&sectors()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,weight,start_angle,end_angle,span,mid_angle");
        assert!(lines[1].starts_with("A,3.0,90.0,-180.0,270.0,"));
        assert!(lines[2].starts_with("B,1.0,-180.0,-270.0,90.0,"));
    }

    #[test]
    fn test_json_report_carries_timestamp_and_total() {
        let json = sectors_to_json(&sectors()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["generated_at"].is_string());
        assert_eq!(value["total_weight"], 4.0);
        assert_eq!(value["sectors"][0]["name"], "A");
        assert_eq!(value["sectors"][1]["span"], 90.0);
    }
}
