//! Two-ring partitioned circle with a centre total.
//!
//! Geometry is laid out in units where the outer ring has radius 1 and the
//! canvas spans -1.5..1.5 on both axes.

use crate::diagrams::{format_weight, pt_scale};
use crate::domain::model::Sector;
use crate::render::color::Color;
use crate::render::scene::{Label, Path, Point, Scene, Stroke};

const HALF_EXTENT: f32 = 1.5;
const OUTER_RADIUS: f32 = 1.0;
const INNER_RADIUS: f32 = 0.7;
const CENTER_RADIUS: f32 = 0.3;
const BADGE_RING: f64 = 0.85;
const BADGE_RADIUS: f32 = 0.08;
const LABEL_RING: f64 = 1.25;

#[derive(Debug, Clone)]
pub struct CircularSlice {
    pub sector: Sector,
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct CircularStyle {
    pub size: u32,
    pub title: String,
    pub subtitle: Option<String>,
    /// Defaults to the total weight.
    pub center_label: Option<String>,
    pub center_caption: String,
    pub center_color: Color,
    pub subtitle_color: Color,
    pub background: Color,
}

impl Default for CircularStyle {
    fn default() -> Self {
        Self {
            size: 1200,
            title: String::new(),
            subtitle: None,
            center_label: None,
            center_caption: "FIELDS".to_string(),
            center_color: Color::rgb(0x2c, 0x3e, 0x50),
            subtitle_color: Color::rgb(0x66, 0x66, 0x66),
            background: Color::WHITE,
        }
    }
}

pub fn build_circular_scene(slices: &[CircularSlice], style: &CircularStyle) -> Scene {
    let size = style.size as f32;
    let unit = size / (2.0 * HALF_EXTENT);
    let center = Point::new(size / 2.0, size / 2.0);
    // designed as a 12 inch figure
    let pt = pt_scale(size, 12.0);
    let at = |x: f64, y: f64| Point::new(center.x + x as f32 * unit, center.y - y as f32 * unit);

    let mut scene = Scene::new(style.size, style.size, style.background);

    for slice in slices {
        let sector = &slice.sector;

        scene.fill_and_stroke(
            Path::wedge(center, OUTER_RADIUS * unit, 0.0, sector.start_angle, sector.end_angle),
            slice.color.with_alpha(0.8),
            Stroke::new(Color::WHITE, 3.0 * pt),
        );
        scene.fill_and_stroke(
            Path::wedge(center, INNER_RADIUS * unit, 0.0, sector.start_angle, sector.end_angle),
            slice.color.with_alpha(0.3),
            Stroke::new(Color::WHITE, 2.0 * pt),
        );
    }

    let total: f64 = slices.iter().map(|s| s.sector.category.weight).sum();

    scene.fill_and_stroke(
        Path::circle(center, CENTER_RADIUS * unit),
        style.center_color,
        Stroke::new(Color::WHITE, 3.0 * pt),
    );
    let center_text = style
        .center_label
        .clone()
        .unwrap_or_else(|| format_weight(total));
    scene.label(Label::new(at(0.0, 0.05), center_text, 36.0 * pt, Color::WHITE).bold());
    scene.label(Label::new(
        at(0.0, -0.08),
        style.center_caption.clone(),
        10.0 * pt,
        Color::WHITE,
    ));

    for slice in slices {
        let sector = &slice.sector;

        let (lx, ly) = sector.point_at(LABEL_RING);
        scene.label(Label::new(at(lx, ly), slice.label.clone(), 11.0 * pt, slice.color).bold());

        let (bx, by) = sector.point_at(BADGE_RING);
        let badge = at(bx, by);
        scene.fill_and_stroke(
            Path::circle(badge, BADGE_RADIUS * unit),
            Color::WHITE,
            Stroke::new(slice.color, 2.0 * pt),
        );
        scene.label(
            Label::new(badge, format_weight(sector.category.weight), 12.0 * pt, slice.color).bold(),
        );
    }

    if !style.title.is_empty() {
        scene.label(
            Label::new(at(0.0, 1.4), style.title.clone(), 18.0 * pt, style.center_color).bold(),
        );
    }
    if let Some(subtitle) = &style.subtitle {
        scene.label(
            Label::new(at(0.0, -1.4), subtitle.clone(), 10.0 * pt, style.subtitle_color).italic(),
        );
    }

    scene
}
