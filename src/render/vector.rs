use crate::render::color::Color;
use crate::render::scene::{Anchor, Item, Label, Path, PathCmd, Scene, Stroke};
use svg::node::element::path::Data;
use svg::node::element::{Path as SvgPath, Rectangle, Text};
use svg::Document;

fn path_data(path: &Path) -> Data {
    let mut data = Data::new();
    for cmd in path.commands() {
        data = match cmd {
            PathCmd::MoveTo(p) => data.move_to((p.x, p.y)),
            PathCmd::LineTo(p) => data.line_to((p.x, p.y)),
            PathCmd::CubicTo { c1, c2, end } => {
                data.cubic_curve_to(vec![c1.x, c1.y, c2.x, c2.y, end.x, end.y])
            }
            PathCmd::Close => data.close(),
        };
    }
    data
}

fn shape_element(path: &Path, fill: Option<Color>, stroke: Option<&Stroke>) -> SvgPath {
    let mut element = SvgPath::new().set("d", path_data(path));

    element = match fill {
        Some(color) if !color.is_transparent() => {
            let element = element.set("fill", color.to_hex());
            if color.a < 255 {
                element.set("fill-opacity", format!("{:.3}", color.opacity()))
            } else {
                element
            }
        }
        _ => element.set("fill", "none"),
    };

    if let Some(stroke) = stroke {
        element = element
            .set("stroke", stroke.color.to_hex())
            .set("stroke-width", stroke.width)
            .set("stroke-linejoin", "round");
        if stroke.color.a < 255 {
            element = element.set("stroke-opacity", format!("{:.3}", stroke.color.opacity()));
        }
        if let Some(dash) = &stroke.dash {
            let pattern: Vec<String> = dash.iter().map(|d| d.to_string()).collect();
            element = element.set("stroke-dasharray", pattern.join(" "));
        }
    }

    element
}

fn text_elements(label: &Label) -> Vec<Text> {
    let anchor = match label.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let lines: Vec<&str> = label.lines().collect();
    let count = lines.len() as f32;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let y = label.position.y + (i as f32 - (count - 1.0) / 2.0) * label.line_height();
            let mut text = Text::new()
                .add(svg::node::Text::new(*line))
                .set("x", label.position.x)
                .set("y", y)
                .set("font-family", "Helvetica, Arial, sans-serif")
                .set("font-size", label.size)
                .set("fill", label.color.to_hex())
                .set("text-anchor", anchor)
                .set("dominant-baseline", "middle");
            if label.bold {
                text = text.set("font-weight", "bold");
            }
            if label.italic {
                text = text.set("font-style", "italic");
            }
            if label.color.a < 255 {
                text = text.set("fill-opacity", format!("{:.3}", label.color.opacity()));
            }
            text
        })
        .collect()
}

/// Serialize `scene` as an SVG document sized `scale` times its nominal size.
pub fn render_svg(scene: &Scene, scale: f32) -> String {
    let width = scene.width as f32 * scale;
    let height = scene.height as f32 * scale;

    let mut document = Document::new()
        .set("viewBox", (0, 0, scene.width, scene.height))
        .set("width", format!("{width}px"))
        .set("height", format!("{height}px"));

    if !scene.background.is_transparent() {
        let background = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", scene.width)
            .set("height", scene.height)
            .set("fill", scene.background.to_hex());
        document = document.add(background);
    }

    for item in &scene.items {
        match item {
            Item::Shape { path, fill, stroke } => {
                document = document.add(shape_element(path, *fill, stroke.as_ref()));
            }
            Item::Label(label) => {
                for text in text_elements(label) {
                    document = document.add(text);
                }
            }
        }
    }

    document.to_string()
}
