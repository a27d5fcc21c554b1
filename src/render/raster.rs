use crate::render::color::Color;
use crate::render::scene::{Item, Label, Path, PathCmd, Point, Scene, Stroke};
use crate::render::text;
use crate::utils::error::{InfographicError, Result};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, StrokeDash, Transform};

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn build_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in path.commands() {
        match cmd {
            PathCmd::MoveTo(p) => pb.move_to(p.x, p.y),
            PathCmd::LineTo(p) => pb.line_to(p.x, p.y),
            PathCmd::CubicTo { c1, c2, end } => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y),
            PathCmd::Close => pb.close(),
        }
    }
    pb.finish()
}

fn build_polyline(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

fn sk_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: stroke.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: stroke
            .dash
            .as_ref()
            .and_then(|d| StrokeDash::new(d.clone(), 0.0)),
        ..Default::default()
    }
}

fn draw_label(pixmap: &mut Pixmap, label: &Label, transform: Transform) {
    let paint = paint_for(label.color);
    let stroke = tiny_skia::Stroke {
        width: text::stroke_width(label),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };

    for polyline in text::label_strokes(label) {
        if let Some(path) = build_polyline(&polyline) {
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}

/// Rasterize `scene` at `scale` times its nominal size and encode it as PNG.
pub fn render_png(scene: &Scene, scale: f32) -> Result<Vec<u8>> {
    let width = (scene.width as f32 * scale).round() as u32;
    let height = (scene.height as f32 * scale).round() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        InfographicError::render(format!("cannot allocate a {}x{} canvas", width, height))
    })?;

    if !scene.background.is_transparent() {
        let bg = scene.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    }

    let transform = Transform::from_scale(scale, scale);
    let mut skipped = 0usize;

    for item in &scene.items {
        match item {
            Item::Shape { path, fill, stroke } => {
                let Some(sk_path) = build_path(path) else {
                    skipped += 1;
                    continue;
                };
                if let Some(color) = fill {
                    pixmap.fill_path(
                        &sk_path,
                        &paint_for(*color),
                        FillRule::Winding,
                        transform,
                        None,
                    );
                }
                if let Some(stroke) = stroke {
                    pixmap.stroke_path(
                        &sk_path,
                        &paint_for(stroke.color),
                        &sk_stroke(stroke),
                        transform,
                        None,
                    );
                }
            }
            Item::Label(label) => draw_label(&mut pixmap, label, transform),
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} degenerate shapes while rasterizing", skipped);
    }

    pixmap
        .encode_png()
        .map_err(|e| InfographicError::render(format!("PNG encoding failed: {}", e)))
}
