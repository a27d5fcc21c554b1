use crate::core::partition::PartitionOptions;
use crate::diagrams::cards::{Benefit, Card, CardsStyle};
use crate::diagrams::circular::CircularStyle;
use crate::diagrams::flowchart::Flowchart;
use crate::diagrams::grid::{GridStyle, Panel};
use crate::diagrams::DiagramKind;
use crate::domain::model::{Category, Direction};
use crate::domain::ports::ConfigProvider;
use crate::render::color::Color;
use crate::render::ImageFormat;
use crate::utils::error::{InfographicError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const REPORT_FORMATS: [&str; 2] = ["json", "csv"];
pub const IMAGE_FORMATS: [&str; 2] = ["png", "svg"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub project: ProjectConfig,
    pub partition: Option<PartitionConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    pub circular: Option<CircularConfig>,
    pub cards: Option<CardsConfig>,
    pub grid: Option<GridConfig>,
    pub flowchart: Option<FlowchartConfig>,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub start_angle: Option<f64>,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Display text on the circular diagram; may contain `\n`.
    pub label: Option<String>,
    pub color: String,
    /// Defaults to the number of fields.
    pub weight: Option<f64>,
    #[serde(default)]
    pub fields: Vec<String>,
    pub icon: Option<String>,
    /// Grid panel caption; `(N fields)` when unset.
    pub caption: Option<String>,
}

impl CategoryConfig {
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(self.fields.len() as f64)
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn fill_color(&self) -> Color {
        color_or(Some(self.color.as_str()), Color::BLACK)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularConfig {
    pub enabled: Option<bool>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub center_label: Option<String>,
    pub center_caption: Option<String>,
    pub center_color: Option<String>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsConfig {
    pub enabled: Option<bool>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub summary: Vec<String>,
    pub dark_color: Option<String>,
    pub accent_color: Option<String>,
    pub text_color: Option<String>,
    pub width: Option<u32>,
    #[serde(default)]
    pub benefits: Vec<BenefitConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitConfig {
    /// Disc text; the 1-based position when unset.
    pub icon: Option<String>,
    /// Caption under the disc; may contain `\n`.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub enabled: Option<bool>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Vec<String>,
    pub header_color: Option<String>,
    pub text_color: Option<String>,
    pub background: Option<String>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartConfig {
    pub enabled: Option<bool>,
    pub file_name: Option<String>,
    /// External renderer, e.g. `mmdc`. Only the `.mmd` source is written when unset.
    pub renderer: Option<String>,
    pub background: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(flatten)]
    pub chart: Flowchart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub reports: Vec<String>,
    pub report_name: Option<String>,
    pub background: Option<String>,
    pub scale: Option<f32>,
    pub bundle: Option<BundleConfig>,
}

fn default_formats() -> Vec<String> {
    vec!["png".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn color_or(value: Option<&str>, fallback: Color) -> Color {
    value.and_then(Color::parse).unwrap_or(fallback)
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InfographicError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            InfographicError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("project.name", &self.project.name)?;
        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_allowed_values(
            "output.formats",
            &self.output.formats,
            &IMAGE_FORMATS,
        )?;
        validation::validate_allowed_values(
            "output.reports",
            &self.output.reports,
            &REPORT_FORMATS,
        )?;

        if let Some(scale) = self.output.scale {
            validation::validate_range("output.scale", scale, 0.1, 8.0)?;
        }
        if let Some(background) = &self.output.background {
            validation::validate_color("output.background", background)?;
        }
        if let Some(name) = &self.output.report_name {
            validation::validate_file_stem("output.report_name", name)?;
        }
        if let Some(bundle) = &self.output.bundle {
            if bundle.enabled {
                validation::validate_file_stem("output.bundle.filename", &bundle.filename)?;
            }
        }

        if let Some(partition) = &self.partition {
            if let Some(angle) = partition.start_angle {
                if !angle.is_finite() {
                    return Err(InfographicError::InvalidConfigValueError {
                        field: "partition.start_angle".to_string(),
                        value: angle.to_string(),
                        reason: "Angle must be a finite number of degrees".to_string(),
                    });
                }
            }
        }

        let needs_categories = self.is_enabled(DiagramKind::Circular)
            || self.is_enabled(DiagramKind::Cards)
            || self.is_enabled(DiagramKind::Grid);
        if needs_categories && self.categories.is_empty() {
            return Err(InfographicError::MissingConfigError {
                field: "categories".to_string(),
            });
        }

        for (i, category) in self.categories.iter().enumerate() {
            validation::validate_non_empty_string(
                &format!("categories[{}].name", i),
                &category.name,
            )?;
            validation::validate_color(&format!("categories[{}].color", i), &category.color)?;
            validation::validate_positive_weight(
                &format!("categories[{}].weight", i),
                category.weight(),
            )?;
        }

        if let Some(circular) = &self.circular {
            if let Some(size) = circular.size {
                validation::validate_range("circular.size", size, 64, 8192)?;
            }
            if let Some(color) = &circular.center_color {
                validation::validate_color("circular.center_color", color)?;
            }
            if let Some(name) = &circular.file_name {
                validation::validate_file_stem("circular.file_name", name)?;
            }
        }

        if let Some(cards) = &self.cards {
            if let Some(width) = cards.width {
                validation::validate_range("cards.width", width, 200, 16384)?;
            }
            for (field, value) in [
                ("cards.dark_color", &cards.dark_color),
                ("cards.accent_color", &cards.accent_color),
                ("cards.text_color", &cards.text_color),
            ] {
                if let Some(color) = value {
                    validation::validate_color(field, color)?;
                }
            }
            if let Some(name) = &cards.file_name {
                validation::validate_file_stem("cards.file_name", name)?;
            }
            for (i, benefit) in cards.benefits.iter().enumerate() {
                validation::validate_non_empty_string(
                    &format!("cards.benefits[{}].text", i),
                    &benefit.text,
                )?;
            }
        }

        if let Some(grid) = &self.grid {
            if let Some(width) = grid.width {
                validation::validate_range("grid.width", width, 200, 16384)?;
            }
            for (field, value) in [
                ("grid.header_color", &grid.header_color),
                ("grid.text_color", &grid.text_color),
                ("grid.background", &grid.background),
            ] {
                if let Some(color) = value {
                    validation::validate_color(field, color)?;
                }
            }
            if let Some(name) = &grid.file_name {
                validation::validate_file_stem("grid.file_name", name)?;
            }
        }

        if let Some(flowchart) = &self.flowchart {
            if self.is_enabled(DiagramKind::Flowchart) {
                flowchart.chart.validate()?;
            }
            if let Some(name) = &flowchart.file_name {
                validation::validate_file_stem("flowchart.file_name", name)?;
            }
            if let Some(renderer) = &flowchart.renderer {
                validation::validate_non_empty_string("flowchart.renderer", renderer)?;
            }
        }

        Ok(())
    }

    pub fn is_enabled(&self, kind: DiagramKind) -> bool {
        match kind {
            DiagramKind::Circular => self
                .circular
                .as_ref()
                .map(|c| c.enabled.unwrap_or(true))
                .unwrap_or(false),
            DiagramKind::Cards => self
                .cards
                .as_ref()
                .map(|c| c.enabled.unwrap_or(true))
                .unwrap_or(false),
            DiagramKind::Grid => self
                .grid
                .as_ref()
                .map(|c| c.enabled.unwrap_or(true))
                .unwrap_or(false),
            DiagramKind::Flowchart => self
                .flowchart
                .as_ref()
                .map(|c| c.enabled.unwrap_or(true))
                .unwrap_or(false),
        }
    }

    pub fn enabled_diagrams(&self) -> Vec<DiagramKind> {
        [
            DiagramKind::Circular,
            DiagramKind::Cards,
            DiagramKind::Grid,
            DiagramKind::Flowchart,
        ]
        .into_iter()
        .filter(|kind| self.is_enabled(*kind))
        .collect()
    }

    /// Disable every diagram not listed in `kinds`. An empty list keeps all.
    pub fn restrict_to(&mut self, kinds: &[DiagramKind]) {
        if kinds.is_empty() {
            return;
        }
        if let Some(c) = self.circular.as_mut() {
            c.enabled = Some(c.enabled.unwrap_or(true) && kinds.contains(&DiagramKind::Circular));
        }
        if let Some(c) = self.cards.as_mut() {
            c.enabled = Some(c.enabled.unwrap_or(true) && kinds.contains(&DiagramKind::Cards));
        }
        if let Some(c) = self.grid.as_mut() {
            c.enabled = Some(c.enabled.unwrap_or(true) && kinds.contains(&DiagramKind::Grid));
        }
        if let Some(c) = self.flowchart.as_mut() {
            c.enabled = Some(c.enabled.unwrap_or(true) && kinds.contains(&DiagramKind::Flowchart));
        }
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }

    pub fn image_formats(&self) -> Result<Vec<ImageFormat>> {
        self.output.formats.iter().map(|f| f.parse()).collect()
    }

    pub fn scale(&self) -> f32 {
        self.output.scale.unwrap_or(1.0)
    }

    pub fn background(&self) -> Color {
        color_or(self.output.background.as_deref(), Color::WHITE)
    }

    pub fn report_name(&self) -> &str {
        self.output.report_name.as_deref().unwrap_or("sector_layout")
    }

    pub fn bundle_filename(&self) -> Option<&str> {
        self.output
            .bundle
            .as_ref()
            .filter(|b| b.enabled)
            .map(|b| b.filename.as_str())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn circular_file_name(&self) -> &str {
        self.circular
            .as_ref()
            .and_then(|c| c.file_name.as_deref())
            .unwrap_or("circular")
    }

    pub fn cards_file_name(&self) -> &str {
        self.cards
            .as_ref()
            .and_then(|c| c.file_name.as_deref())
            .unwrap_or("cards")
    }

    pub fn grid_file_name(&self) -> &str {
        self.grid
            .as_ref()
            .and_then(|c| c.file_name.as_deref())
            .unwrap_or("grid")
    }

    pub fn flowchart_file_name(&self) -> &str {
        self.flowchart
            .as_ref()
            .and_then(|c| c.file_name.as_deref())
            .unwrap_or("flowchart")
    }

    pub fn circular_style(&self) -> CircularStyle {
        let defaults = CircularStyle {
            background: self.background(),
            ..CircularStyle::default()
        };
        let Some(c) = &self.circular else {
            return defaults;
        };

        CircularStyle {
            size: c.size.unwrap_or(defaults.size),
            title: c.title.clone().unwrap_or_default(),
            subtitle: c.subtitle.clone(),
            center_label: c.center_label.clone(),
            center_caption: c
                .center_caption
                .clone()
                .unwrap_or_else(|| defaults.center_caption.clone()),
            center_color: color_or(c.center_color.as_deref(), defaults.center_color),
            ..defaults
        }
    }

    pub fn cards_style(&self) -> CardsStyle {
        let defaults = CardsStyle {
            background: self.background(),
            ..CardsStyle::default()
        };
        let Some(c) = &self.cards else {
            return defaults;
        };

        CardsStyle {
            width: c.width.unwrap_or(defaults.width),
            title: c.title.clone().unwrap_or_default(),
            subtitle: c.subtitle.clone(),
            summary: c.summary.clone(),
            dark: color_or(c.dark_color.as_deref(), defaults.dark),
            accent: color_or(c.accent_color.as_deref(), defaults.accent),
            text: color_or(c.text_color.as_deref(), defaults.text),
            benefits: c
                .benefits
                .iter()
                .map(|b| Benefit {
                    icon: b.icon.clone(),
                    text: b.text.clone(),
                })
                .collect(),
            ..defaults
        }
    }

    pub fn grid_style(&self) -> GridStyle {
        let defaults = GridStyle::default();
        let Some(c) = &self.grid else {
            return defaults;
        };

        GridStyle {
            width: c.width.unwrap_or(defaults.width),
            title: c.title.clone().unwrap_or_default(),
            summary: c.summary.clone(),
            header: color_or(c.header_color.as_deref(), defaults.header),
            text: color_or(c.text_color.as_deref(), defaults.text),
            background: color_or(c.background.as_deref(), defaults.background),
            ..defaults
        }
    }

    /// One panel per category, titled by its label on a single line.
    pub fn panels(&self) -> Vec<Panel> {
        self.categories
            .iter()
            .map(|c| Panel {
                title: c.display_label().replace('\n', " "),
                caption: c.caption.clone(),
                count: c.weight(),
                fields: c.fields.clone(),
                color: c.fill_color(),
            })
            .collect()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.categories
            .iter()
            .map(|c| Card {
                title: c.name.clone(),
                count: c.weight(),
                fields: c.fields.clone(),
                color: c.fill_color(),
                icon: c.icon.clone(),
            })
            .collect()
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn partition_options(&self) -> PartitionOptions {
        let defaults = PartitionOptions::default();
        match &self.partition {
            Some(p) => PartitionOptions {
                start_angle: p.start_angle.unwrap_or(defaults.start_angle),
                direction: p.direction.unwrap_or(defaults.direction),
            },
            None => defaults,
        }
    }

    fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|c| Category::new(c.name.clone(), c.weight()))
            .collect()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
