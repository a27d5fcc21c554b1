use serde::{Deserialize, Serialize};

/// A named share of the circle. `weight` is usually a field count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub weight: f64,
}

impl Category {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Decreasing angle.
    #[default]
    Clockwise,
    /// Increasing angle.
    CounterClockwise,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "clockwise" | "cw" => Ok(Direction::Clockwise),
            "counter_clockwise" | "counterclockwise" | "ccw" => Ok(Direction::CounterClockwise),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Angles are degrees in the usual x/y convention: 0 points right, 90 points up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub category: Category,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Sector {
    pub fn name(&self) -> &str {
        &self.category.name
    }

    pub fn span(&self) -> f64 {
        (self.start_angle - self.end_angle).abs()
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Point on the sector's bisector at `radius` from the centre, y up.
    pub fn point_at(&self, radius: f64) -> (f64, f64) {
        let mid = self.mid_angle().to_radians();
        (radius * mid.cos(), radius * mid.sin())
    }
}

/// One encoded file produced by the transform step.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub sectors: Vec<Sector>,
    pub artifacts: Vec<Artifact>,
}

impl RenderOutput {
    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("clockwise".parse::<Direction>(), Ok(Direction::Clockwise));
        assert_eq!(
            "counter-clockwise".parse::<Direction>(),
            Ok(Direction::CounterClockwise)
        );
        assert_eq!("CCW".parse::<Direction>(), Ok(Direction::CounterClockwise));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_names() {
        let json = serde_json::to_string(&Direction::CounterClockwise).unwrap();
        assert_eq!(json, "\"counter_clockwise\"");
    }

    #[test]
    fn test_sector_point_at_top() {
        let sector = Sector {
            category: Category::new("A", 1.0),
            start_angle: 135.0,
            end_angle: 45.0,
        };
        let (x, y) = sector.point_at(2.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 2.0).abs() < 1e-12);
        assert_eq!(sector.span(), 90.0);
    }
}
