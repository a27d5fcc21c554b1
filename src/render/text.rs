//! Stroke-font text for the raster backend.
//!
//! Labels are turned into polylines from the Hershey fonts shipped with
//! `vector-text`, then stroked like any other path. Characters outside
//! Latin-1 have no glyph and are skipped.

use crate::render::scene::{Anchor, Label, Point};
use vector_text::{render_text, HersheyFont, VectorFont};

/// Hershey glyphs live on a 32-unit em.
const EM_UNITS: f32 = 32.0;
/// Vertical centre of the cap height in font units (caps span -12..9).
const CAP_MIDDLE: f32 = -1.5;

#[derive(Debug, Clone, Default)]
pub struct GlyphRun {
    /// Polylines relative to the left edge and vertical centre of the line.
    pub strokes: Vec<Vec<Point>>,
    pub width: f32,
}

fn font_for(bold: bool, italic: bool) -> VectorFont {
    match (bold, italic) {
        (_, true) => VectorFont::HersheyFont(HersheyFont::Italicc),
        (true, false) => VectorFont::HersheyFont(HersheyFont::Romant),
        (false, false) => VectorFont::HersheyFont(HersheyFont::Romans),
    }
}

pub fn layout_line(text: &str, size: f32, bold: bool, italic: bool) -> GlyphRun {
    let scale = size / EM_UNITS;
    let points = render_text(text, font_for(bold, italic));

    let mut run = GlyphRun::default();
    let mut current: Vec<Point> = Vec::new();
    let mut max_x = 0.0f32;

    for p in &points {
        let x = p.x as f32 * scale;
        let y = (p.y as f32 - CAP_MIDDLE) * scale;
        max_x = max_x.max(x);

        if !p.pen && !current.is_empty() {
            run.strokes.push(std::mem::take(&mut current));
        }
        current.push(Point::new(x, y));
    }
    if !current.is_empty() {
        run.strokes.push(current);
    }

    run.strokes.retain(|s| s.len() > 1);
    run.width = max_x;
    run
}

/// Pen width for a label, heavier for bold text.
pub fn stroke_width(label: &Label) -> f32 {
    let base = (label.size / 14.0).max(0.75);
    if label.bold {
        base * 1.6
    } else {
        base
    }
}

/// Positioned polylines for every line of `label`.
pub fn label_strokes(label: &Label) -> Vec<Vec<Point>> {
    let lines: Vec<&str> = label.lines().collect();
    let count = lines.len() as f32;
    let mut strokes = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let run = layout_line(line, label.size, label.bold, label.italic);
        let dy = (i as f32 - (count - 1.0) / 2.0) * label.line_height();
        let left = match label.anchor {
            Anchor::Start => label.position.x,
            Anchor::Middle => label.position.x - run.width / 2.0,
            Anchor::End => label.position.x - run.width,
        };
        let top = label.position.y + dy;

        strokes.extend(run.strokes.into_iter().map(|stroke| {
            stroke
                .into_iter()
                .map(|p| Point::new(p.x + left, p.y + top))
                .collect()
        }));
    }

    strokes
}
