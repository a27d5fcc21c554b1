pub mod cards;
pub mod circular;
pub mod flowchart;
pub mod grid;

use crate::render::scene::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Circular,
    Cards,
    Grid,
    Flowchart,
}

impl std::fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagramKind::Circular => "circular",
            DiagramKind::Cards => "cards",
            DiagramKind::Grid => "grid",
            DiagramKind::Flowchart => "flowchart",
        };
        f.write_str(name)
    }
}

/// `6` rather than `6.0` for whole-number weights.
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{}", weight as i64)
    } else {
        format!("{:.1}", weight)
    }
}

/// Maps layout units (origin bottom-left, y up) onto pixels.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    /// Pixels per layout unit.
    pub unit: f32,
    pub height_units: f32,
}

impl Grid {
    pub fn new(unit: f32, height_units: f32) -> Self {
        Self { unit, height_units }
    }

    pub fn point(&self, x: f32, y: f32) -> Point {
        Point::new(x * self.unit, (self.height_units - y) * self.unit)
    }

    pub fn len(&self, units: f32) -> f32 {
        units * self.unit
    }
}

/// Font points to pixels for a figure `width_px` wide that was designed at
/// `width_inches`.
pub fn pt_scale(width_px: f32, width_inches: f32) -> f32 {
    width_px / (width_inches * 72.0)
}
