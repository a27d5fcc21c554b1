//! Two-column grid of tinted category panels under a title box.
//!
//! The page is 16 units wide. Each row is as tall as its longest field
//! list, so the page height follows the number of categories.

use crate::diagrams::{format_weight, pt_scale, Grid};
use crate::render::color::Color;
use crate::render::scene::{Anchor, Label, Path, Scene, Stroke};

const PAGE_WIDTH: f32 = 16.0;
const MARGIN: f32 = 0.8;
const COLUMN_GAP: f32 = 0.64;
const ROW_GAP: f32 = 0.7;
const TITLE_GAP: f32 = 1.2;
const TITLE_HEIGHT: f32 = 1.0;
const FIELD_SPACING: f32 = 0.25;
const SUMMARY_HEIGHT: f32 = 1.2;
const FRAME_COUNT: usize = 5;

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    /// Italic line under the title; `(N fields)` when unset.
    pub caption: Option<String>,
    pub count: f64,
    pub fields: Vec<String>,
    pub color: Color,
}

impl Panel {
    pub fn caption_text(&self) -> String {
        match &self.caption {
            Some(caption) => caption.clone(),
            None if self.count == 1.0 => "(1 field)".to_string(),
            None => format!("({} fields)", format_weight(self.count)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GridStyle {
    pub width: u32,
    pub title: String,
    pub summary: Vec<String>,
    pub header: Color,
    pub text: Color,
    pub panel: Color,
    pub background: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            width: 1600,
            title: String::new(),
            summary: Vec::new(),
            header: Color::rgb(0x2c, 0x3e, 0x50),
            text: Color::rgb(0x2c, 0x3e, 0x50),
            panel: Color::rgb(0xec, 0xf0, 0xf1),
            background: Color::rgb(0xf8, 0xf9, 0xfa),
        }
    }
}

/// Panel height for a row whose longest list has `max_fields` entries.
pub fn panel_height(max_fields: usize) -> f32 {
    0.8 + FIELD_SPACING * max_fields as f32
}

fn field_name(field: &str) -> &str {
    field.split_once(':').map(|(name, _)| name.trim()).unwrap_or(field)
}

pub fn build_grid_scene(panels: &[Panel], style: &GridStyle) -> Scene {
    let rows: Vec<&[Panel]> = panels.chunks(2).collect();
    let heights: Vec<f32> = rows
        .iter()
        .map(|row| panel_height(row.iter().map(|p| p.fields.len()).max().unwrap_or(0)))
        .collect();

    let bottom = if style.summary.is_empty() {
        0.8
    } else {
        0.5 + SUMMARY_HEIGHT + 1.1
    };
    let rows_height: f32 =
        heights.iter().sum::<f32>() + ROW_GAP * heights.len().saturating_sub(1) as f32;
    let title_bottom = bottom + rows_height + TITLE_GAP;
    let page_height = title_bottom + TITLE_HEIGHT + 0.2;

    let unit = style.width as f32 / PAGE_WIDTH;
    let grid = Grid::new(unit, page_height);
    // one layout unit is one inch of the design
    let pt = pt_scale(style.width as f32, PAGE_WIDTH);
    let px_height = (page_height * unit).round() as u32;

    let mut scene = Scene::new(style.width, px_height, style.background);
    let centre_x = PAGE_WIDTH / 2.0;

    let title_top = grid.point(MARGIN, title_bottom + TITLE_HEIGHT);
    scene.fill(
        Path::rounded_rect(
            title_top.x,
            title_top.y,
            grid.len(PAGE_WIDTH - 2.0 * MARGIN),
            grid.len(TITLE_HEIGHT),
            grid.len(0.1),
        ),
        style.header,
    );
    scene.label(
        Label::new(
            grid.point(centre_x, title_bottom + TITLE_HEIGHT / 2.0),
            style.title.clone(),
            24.0 * pt,
            Color::WHITE,
        )
        .bold(),
    );

    let column_width = (PAGE_WIDTH - 2.0 * MARGIN - COLUMN_GAP) / 2.0;
    let mut top = title_bottom - TITLE_GAP;
    for (row, height) in rows.iter().zip(&heights) {
        for (column, panel) in row.iter().enumerate() {
            let x = MARGIN + column as f32 * (column_width + COLUMN_GAP);
            draw_panel(&mut scene, &grid, pt, style, panel, x, top, column_width, *height);
        }
        top -= height + ROW_GAP;
    }

    if !style.summary.is_empty() {
        let summary_top = grid.point(MARGIN, 0.5 + SUMMARY_HEIGHT);
        scene.fill_and_stroke(
            Path::rounded_rect(
                summary_top.x,
                summary_top.y,
                grid.len(PAGE_WIDTH - 2.0 * MARGIN),
                grid.len(SUMMARY_HEIGHT),
                grid.len(0.1),
            ),
            style.panel,
            Stroke::new(style.header, pt),
        );
        for (i, line) in style.summary.iter().enumerate() {
            let position = grid.point(centre_x, 1.3 - 0.5 * i as f32);
            let label = if i == 0 {
                Label::new(position, line.clone(), 12.0 * pt, style.header).bold()
            } else {
                Label::new(position, line.clone(), 10.0 * pt, style.text).italic()
            };
            scene.label(label);
        }
    }

    for i in 0..FRAME_COUNT {
        let inset = 0.3 - i as f32 * 0.05;
        let alpha = 0.05 - i as f32 * 0.01;
        let corner = grid.point(inset, page_height - inset);
        scene.stroke(
            Path::rounded_rect(
                corner.x,
                corner.y,
                grid.len(PAGE_WIDTH - 2.0 * inset),
                grid.len(page_height - 2.0 * inset),
                grid.len(0.05),
            ),
            Stroke::new(style.header.with_alpha(alpha), pt),
        );
    }

    scene
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    scene: &mut Scene,
    grid: &Grid,
    pt: f32,
    style: &GridStyle,
    panel: &Panel,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    let origin = grid.point(x, top);
    scene.fill_and_stroke(
        Path::rounded_rect(origin.x, origin.y, grid.len(width), grid.len(height), grid.len(0.08)),
        panel.color.with_alpha(0.15),
        Stroke::new(panel.color, 2.0 * pt),
    );

    let heading_y = top - 0.1;
    scene.label(
        Label::new(
            grid.point(x + width / 2.0, heading_y),
            panel.title.clone(),
            14.0 * pt,
            panel.color,
        )
        .bold(),
    );
    scene.label(
        Label::new(
            grid.point(x + width / 2.0, heading_y - 0.3),
            panel.caption_text(),
            11.0 * pt,
            panel.color,
        )
        .italic(),
    );

    for (i, field) in panel.fields.iter().enumerate() {
        let y = heading_y - 0.65 - i as f32 * FIELD_SPACING;
        scene.fill(Path::circle(grid.point(x + 0.3, y), grid.len(0.035)), style.text);
        scene.label(
            Label::new(
                grid.point(x + 0.45, y),
                field_name(field).to_string(),
                10.0 * pt,
                style.text,
            )
            .anchor(Anchor::Start),
        );
    }

    let disc = grid.point(x + width - 0.5, heading_y - 1.0);
    scene.fill_and_stroke(
        Path::circle(disc, grid.len(0.25)),
        panel.color,
        Stroke::new(Color::WHITE, 2.0 * pt),
    );
    scene.label(Label::new(disc, format_weight(panel.count), 12.0 * pt, Color::WHITE).bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Item;

    fn panel(title: &str, fields: usize, color: Color) -> Panel {
        Panel {
            title: title.to_string(),
            caption: None,
            count: fields as f64,
            fields: (0..fields).map(|i| format!("FIELD_{}: description", i)).collect(),
            color,
        }
    }

    fn panels() -> Vec<Panel> {
        vec![
            panel("General Document Information", 6, Color::rgb(0x34, 0x98, 0xdb)),
            panel("Date and Amount Information", 5, Color::rgb(0xe7, 0x4c, 0x3c)),
            panel("Line Item Details", 4, Color::rgb(0x2e, 0xcc, 0x71)),
            panel("Transaction Information", 2, Color::rgb(0xf3, 0x9c, 0x12)),
        ]
    }

    #[test]
    fn test_panel_height_follows_longest_list() {
        assert!((panel_height(6) - 2.3).abs() < 1e-6);
        assert!((panel_height(4) - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_four_panels_with_summary_fill_a_sixteen_by_ten_page() {
        let style = GridStyle {
            title: "The 17 Critical Fields".to_string(),
            summary: vec!["Automated Validation".to_string(), "Compliance".to_string()],
            ..GridStyle::default()
        };
        let scene = build_grid_scene(&panels(), &style);

        assert_eq!(scene.width, 1600);
        assert_eq!(scene.height, 1000);
    }

    #[test]
    fn test_captions_counts_and_field_names() {
        let mut items = panels();
        items[3].caption = Some("(2 fields - Bank Statements only)".to_string());
        let scene = build_grid_scene(&items, &GridStyle::default());

        let caption = scene.labels().find(|l| l.text == "(6 fields)").unwrap();
        assert!(caption.italic);
        assert!(scene.labels().any(|l| l.text == "(2 fields - Bank Statements only)"));
        assert!(scene.labels().any(|l| l.text == "FIELD_0"));
        assert!(!scene.labels().any(|l| l.text.contains("description")));

        let counts: Vec<&str> = scene
            .labels()
            .filter(|l| ["6", "5", "4", "2"].contains(&l.text.as_str()) && l.bold)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(counts, vec!["6", "5", "4", "2"]);
    }

    #[test]
    fn test_panels_are_tinted_and_frames_drawn() {
        let scene = build_grid_scene(&panels(), &GridStyle::default());

        let tinted = scene
            .items
            .iter()
            .filter(|i| matches!(i, Item::Shape { fill: Some(c), .. } if c.a == 38))
            .count();
        assert_eq!(tinted, 4);

        let frames = scene
            .items
            .iter()
            .filter(|i| matches!(i, Item::Shape { fill: None, stroke: Some(_), .. }))
            .count();
        assert_eq!(frames, FRAME_COUNT);
    }

    #[test]
    fn test_singular_caption() {
        let one = panel("Only", 1, Color::BLACK);
        assert_eq!(one.caption_text(), "(1 field)");
    }
}
