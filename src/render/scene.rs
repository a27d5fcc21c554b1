//! Backend-neutral display list.
//!
//! Coordinates are screen pixels with y growing downward. Angles passed to
//! the arc helpers use the math convention (0° right, 90° up) so sectors
//! from the partitioner can be drawn as-is.

use crate::render::color::Color;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `self` by a math-convention vector (y up).
    pub fn polar(self, radius: f32, angle_deg: f64) -> Self {
        let a = angle_deg.to_radians();
        Self {
            x: self.x + radius * a.cos() as f32,
            y: self.y - radius * a.sin() as f32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, end: Point },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.cmds.push(PathCmd::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.cmds.push(PathCmd::LineTo(p));
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.cmds.push(PathCmd::CubicTo { c1, c2, end });
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    /// Append an arc from `start_deg` to `end_deg`. The caller is expected to
    /// already be at the arc's start point.
    pub fn arc_to(mut self, center: Point, radius: f32, start_deg: f64, end_deg: f64) -> Self {
        let sweep = (end_deg - start_deg).to_radians();
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let r = radius as f64;

        // math coordinates relative to centre, flipped to screen on output
        let to_screen = |x: f64, y: f64| Point::new(center.x + x as f32, center.y - y as f32);

        let mut a0 = start_deg.to_radians();
        for _ in 0..segments {
            let a1 = a0 + step;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();
            let p1 = to_screen(r * (c0 - k * s0), r * (s0 + k * c0));
            let p2 = to_screen(r * (c1 + k * s1), r * (s1 - k * c1));
            let p3 = to_screen(r * c1, r * s1);
            self.cmds.push(PathCmd::CubicTo { c1: p1, c2: p2, end: p3 });
            a0 = a1;
        }
        self
    }

    pub fn circle(center: Point, radius: f32) -> Self {
        Path::new()
            .move_to(center.polar(radius, 0.0))
            .arc_to(center, radius, 0.0, 360.0)
            .close()
    }

    /// Annular sector between `inner` and `outer` radii. `inner == 0` gives a
    /// pie slice.
    pub fn wedge(center: Point, outer: f32, inner: f32, start_deg: f64, end_deg: f64) -> Self {
        if inner <= 0.0 {
            return Path::new()
                .move_to(center)
                .line_to(center.polar(outer, start_deg))
                .arc_to(center, outer, start_deg, end_deg)
                .close();
        }

        Path::new()
            .move_to(center.polar(outer, start_deg))
            .arc_to(center, outer, start_deg, end_deg)
            .line_to(center.polar(inner, end_deg))
            .arc_to(center, inner, end_deg, start_deg)
            .close()
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Path::new()
            .move_to(Point::new(x, y))
            .line_to(Point::new(x + width, y))
            .line_to(Point::new(x + width, y + height))
            .line_to(Point::new(x, y + height))
            .close()
    }

    pub fn rounded_rect(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Self {
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        if r == 0.0 {
            return Self::rect(x, y, width, height);
        }
        let (right, bottom) = (x + width, y + height);

        Path::new()
            .move_to(Point::new(x + r, y))
            .line_to(Point::new(right - r, y))
            .arc_to(Point::new(right - r, y + r), r, 90.0, 0.0)
            .line_to(Point::new(right, bottom - r))
            .arc_to(Point::new(right - r, bottom - r), r, 0.0, -90.0)
            .line_to(Point::new(x + r, bottom))
            .arc_to(Point::new(x + r, bottom - r), r, -90.0, -180.0)
            .line_to(Point::new(x, y + r))
            .arc_to(Point::new(x + r, y + r), r, 180.0, 90.0)
            .close()
    }

    /// Axis-aligned bounds of every point the path touches, control points included.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.cmds.iter().flat_map(|cmd| match cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => vec![*p],
            PathCmd::CubicTo { c1, c2, end } => vec![*c1, *c2, *end],
            PathCmd::Close => vec![],
        });
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub dash: Option<Vec<f32>>,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some(vec![on, off]);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Vertical centre of the text block; horizontal position per `anchor`.
    pub position: Point,
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub anchor: Anchor,
    pub bold: bool,
    pub italic: bool,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            color,
            anchor: Anchor::Middle,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_height(&self) -> f32 {
        self.size * 1.25
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Shape {
        path: Path,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Label(Label),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub items: Vec<Item>,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            items: Vec::new(),
        }
    }

    pub fn fill(&mut self, path: Path, color: Color) {
        self.items.push(Item::Shape {
            path,
            fill: Some(color),
            stroke: None,
        });
    }

    pub fn stroke(&mut self, path: Path, stroke: Stroke) {
        self.items.push(Item::Shape {
            path,
            fill: None,
            stroke: Some(stroke),
        });
    }

    pub fn fill_and_stroke(&mut self, path: Path, fill: Color, stroke: Stroke) {
        self.items.push(Item::Shape {
            path,
            fill: Some(fill),
            stroke: Some(stroke),
        });
    }

    pub fn label(&mut self, label: Label) {
        self.items.push(Item::Label(label));
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.items.iter().filter_map(|item| match item {
            Item::Label(label) => Some(label),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_polar_is_y_up() {
        let p = Point::new(100.0, 100.0).polar(10.0, 90.0);
        assert!(close(p.x, 100.0));
        assert!(close(p.y, 90.0));
    }

    #[test]
    fn test_wedge_ends_on_inner_arc_start() {
        let center = Point::new(50.0, 50.0);
        let path = Path::wedge(center, 40.0, 28.0, 90.0, -37.0);
        let cmds = path.commands();

        assert_eq!(cmds.first(), Some(&PathCmd::MoveTo(center.polar(40.0, 90.0))));
        assert_eq!(cmds.last(), Some(&PathCmd::Close));

        // last curve lands back on the inner radius at the start angle
        let inner_start = center.polar(28.0, 90.0);
        let last_end = cmds
            .iter()
            .rev()
            .find_map(|c| match c {
                PathCmd::CubicTo { end, .. } => Some(*end),
                _ => None,
            })
            .unwrap();
        assert!(close(last_end.x, inner_start.x) && close(last_end.y, inner_start.y));
    }

    #[test]
    fn test_large_arc_is_split_into_quarter_segments() {
        let path = Path::new()
            .move_to(Point::new(10.0, 0.0))
            .arc_to(Point::default(), 10.0, 0.0, 270.0);
        let curves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCmd::CubicTo { .. }))
            .count();
        assert_eq!(curves, 3);
    }

    #[test]
    fn test_circle_bounds() {
        let (lo, hi) = Path::circle(Point::new(0.0, 0.0), 10.0).bounds().unwrap();
        assert!(close(lo.x, -10.0) && close(lo.y, -10.0));
        assert!(close(hi.x, 10.0) && close(hi.y, 10.0));
    }

    #[test]
    fn test_rounded_rect_stays_inside_box() {
        let (lo, hi) = Path::rounded_rect(5.0, 5.0, 100.0, 40.0, 8.0).bounds().unwrap();
        assert!(lo.x >= 5.0 - 1e-3 && lo.y >= 5.0 - 1e-3);
        assert!(hi.x <= 105.0 + 1e-3 && hi.y <= 45.0 + 1e-3);
    }

    #[test]
    fn test_rect_bounds_and_zero_radius_corners() {
        let (lo, hi) = Path::rect(5.0, 5.0, 100.0, 40.0).bounds().unwrap();
        assert!(close(lo.x, 5.0) && close(lo.y, 5.0));
        assert!(close(hi.x, 105.0) && close(hi.y, 45.0));
        assert_eq!(
            Path::rounded_rect(5.0, 5.0, 100.0, 40.0, 0.0),
            Path::rect(5.0, 5.0, 100.0, 40.0)
        );
    }

    #[test]
    fn test_scene_labels_iterator() {
        let mut scene = Scene::new(10, 10, Color::WHITE);
        scene.fill(Path::rect(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        scene.label(Label::new(Point::new(1.0, 1.0), "17", 12.0, Color::BLACK));
        assert_eq!(scene.labels().count(), 1);
    }
}
