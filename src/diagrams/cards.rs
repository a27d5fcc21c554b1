//! Card-per-category layout with a title banner, an optional benefits row
//! and a summary bar.
//!
//! Layout units follow a 20-unit-wide page; the page grows taller when a
//! card lists more fields than the default card height holds, and again
//! when a benefits row is present.

use crate::diagrams::{format_weight, pt_scale, Grid};
use crate::render::color::Color;
use crate::render::scene::{Anchor, Label, Path, Scene, Stroke};

const PAGE_WIDTH: f32 = 20.0;
const MARGIN: f32 = 0.5;
const GAP: f32 = 0.2;
const CARD_BOTTOM: f32 = 1.5;
const MIN_CARD_HEIGHT: f32 = 4.0;
const HEADER_HEIGHT: f32 = 0.5;
const FIELD_SPACING: f32 = 0.42;
const BANNER_HEIGHT: f32 = 1.3;
const BENEFITS_HEIGHT: f32 = 1.8;
/// Cards listing fewer fields than this get a narrower column.
const NARROW_BELOW: usize = 3;
const NARROW_RATIO: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct Card {
    pub title: String,
    pub count: f64,
    pub fields: Vec<String>,
    pub color: Color,
    /// Badge text in the header; the 1-based card index when unset.
    pub icon: Option<String>,
}

/// One disc of the benefits row.
#[derive(Debug, Clone, PartialEq)]
pub struct Benefit {
    /// Disc text; the 1-based position when unset.
    pub icon: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CardsStyle {
    pub width: u32,
    pub title: String,
    pub subtitle: Option<String>,
    pub summary: Vec<String>,
    pub benefits: Vec<Benefit>,
    pub dark: Color,
    pub accent: Color,
    pub text: Color,
    pub background: Color,
}

impl Default for CardsStyle {
    fn default() -> Self {
        Self {
            width: 1600,
            title: String::new(),
            subtitle: None,
            summary: Vec::new(),
            benefits: Vec::new(),
            dark: Color::rgb(0x1a, 0x1a, 0x2e),
            accent: Color::rgb(0x00, 0xd9, 0xff),
            text: Color::rgb(0x2c, 0x3e, 0x50),
            background: Color::TRANSPARENT,
        }
    }
}

/// Left edge and width of each card column, in layout units.
pub fn card_columns(field_counts: &[usize], available: f32, gap: f32) -> Vec<(f32, f32)> {
    if field_counts.is_empty() {
        return Vec::new();
    }

    let ratios: Vec<f32> = field_counts
        .iter()
        .map(|&n| if n < NARROW_BELOW { NARROW_RATIO } else { 1.0 })
        .collect();
    let total_ratio: f32 = ratios.iter().sum();
    let base = (available - gap * (field_counts.len() - 1) as f32) / total_ratio;

    let mut x = 0.0;
    ratios
        .iter()
        .map(|ratio| {
            let column = (x, base * ratio);
            x += base * ratio + gap;
            column
        })
        .collect()
}

pub fn card_height(max_fields: usize) -> f32 {
    let needed = 0.75 + FIELD_SPACING * max_fields as f32 + 0.3;
    needed.max(MIN_CARD_HEIGHT)
}

fn split_field(field: &str) -> Option<(&str, &str)> {
    field
        .split_once(':')
        .map(|(name, desc)| (name.trim(), desc.trim()))
}

pub fn build_cards_scene(cards: &[Card], style: &CardsStyle) -> Scene {
    let max_fields = cards.iter().map(|c| c.fields.len()).max().unwrap_or(0);
    let height = card_height(max_fields);
    let card_bottom = if style.benefits.is_empty() {
        CARD_BOTTOM
    } else {
        CARD_BOTTOM + BENEFITS_HEIGHT + GAP
    };
    let banner_bottom = card_bottom + height;
    let page_height = banner_bottom + BANNER_HEIGHT + 0.2;

    let unit = style.width as f32 / PAGE_WIDTH;
    let grid = Grid::new(unit, page_height);
    let pt = pt_scale(style.width as f32, PAGE_WIDTH);
    let px_height = (page_height * unit).round() as u32;

    let mut scene = Scene::new(style.width, px_height, style.background);
    let centre_x = PAGE_WIDTH / 2.0;

    // title banner
    let banner_top = grid.point(1.0, banner_bottom + BANNER_HEIGHT);
    scene.fill(
        Path::rounded_rect(
            banner_top.x,
            banner_top.y,
            grid.len(PAGE_WIDTH - 2.0),
            grid.len(BANNER_HEIGHT),
            grid.len(0.1),
        ),
        style.dark,
    );
    scene.label(
        Label::new(
            grid.point(centre_x, banner_bottom + 0.9),
            style.title.clone(),
            28.0 * pt,
            Color::WHITE,
        )
        .bold(),
    );
    if let Some(subtitle) = &style.subtitle {
        scene.label(Label::new(
            grid.point(centre_x, banner_bottom + 0.4),
            subtitle.clone(),
            16.0 * pt,
            style.accent,
        ));
    }

    let counts: Vec<usize> = cards.iter().map(|c| c.fields.len()).collect();
    let columns = card_columns(&counts, PAGE_WIDTH - 2.0 * MARGIN, GAP);

    for (index, (card, (offset, width))) in cards.iter().zip(columns).enumerate() {
        let top = card_bottom + height;
        draw_card(&mut scene, &grid, pt, style, card, index, MARGIN + offset, width, top, height);
    }

    if !style.benefits.is_empty() {
        draw_benefits(&mut scene, &grid, pt, style, CARD_BOTTOM);
    }

    if !style.summary.is_empty() {
        let top = grid.point(MARGIN, 1.4);
        scene.fill_and_stroke(
            Path::rounded_rect(
                top.x,
                top.y,
                grid.len(PAGE_WIDTH - 2.0 * MARGIN),
                grid.len(1.2),
                grid.len(0.1),
            ),
            Color::rgb(0xf8, 0xf9, 0xfa),
            Stroke::new(style.dark.with_alpha(0.7), pt).dashed(6.0 * pt, 4.0 * pt),
        );
        for (i, line) in style.summary.iter().enumerate() {
            let position = grid.point(centre_x, 0.9 - 0.5 * i as f32);
            let label = if i == 0 {
                Label::new(position, line.clone(), 13.0 * pt, style.dark).bold()
            } else {
                Label::new(position, line.clone(), 12.0 * pt, style.text).italic()
            };
            scene.label(label);
        }
    }

    scene
}

#[allow(clippy::too_many_arguments)]
fn draw_card(
    scene: &mut Scene,
    grid: &Grid,
    pt: f32,
    style: &CardsStyle,
    card: &Card,
    index: usize,
    x: f32,
    width: f32,
    top: f32,
    height: f32,
) {
    let corner = grid.len(0.08);

    let shadow = grid.point(x + 0.02, top - 0.02);
    scene.fill(
        Path::rounded_rect(shadow.x, shadow.y, grid.len(width), grid.len(height), corner),
        Color::rgb(0xe0, 0xe0, 0xe0).with_alpha(0.5),
    );

    let origin = grid.point(x, top);
    scene.fill_and_stroke(
        Path::rounded_rect(origin.x, origin.y, grid.len(width), grid.len(height), corner),
        Color::WHITE,
        Stroke::new(card.color, 3.0 * pt),
    );
    scene.fill(
        Path::rounded_rect(
            origin.x,
            origin.y,
            grid.len(width),
            grid.len(HEADER_HEIGHT),
            corner,
        ),
        card.color,
    );

    let header_y = top - HEADER_HEIGHT / 2.0;
    let badge_radius = grid.len(0.15);

    let icon = grid.point(x + 0.35, header_y);
    scene.fill(Path::circle(icon, badge_radius), Color::WHITE);
    let icon_text = card.icon.clone().unwrap_or_else(|| (index + 1).to_string());
    scene.label(Label::new(icon, icon_text, 14.0 * pt, card.color).bold());

    scene.label(
        Label::new(grid.point(x + 0.7, header_y), card.title.clone(), 14.0 * pt, Color::WHITE)
            .bold()
            .anchor(Anchor::Start),
    );

    let count = grid.point(x + width - 0.35, header_y);
    scene.fill(Path::circle(count, badge_radius), Color::WHITE);
    scene.label(Label::new(count, format_weight(card.count), 16.0 * pt, card.color).bold());

    for (i, field) in card.fields.iter().enumerate() {
        let y = top - 0.75 - i as f32 * FIELD_SPACING;
        scene.fill(
            Path::circle(grid.point(x + 0.2, y), grid.len(0.04)),
            card.color.with_alpha(0.7),
        );

        match split_field(field) {
            Some((name, description)) => {
                scene.label(
                    Label::new(
                        grid.point(x + 0.35, y + 0.06),
                        format!("{}:", name),
                        9.0 * pt,
                        style.text,
                    )
                    .bold()
                    .anchor(Anchor::Start),
                );
                scene.label(
                    Label::new(
                        grid.point(x + 0.35, y - 0.14),
                        description.to_string(),
                        8.0 * pt,
                        style.text.with_alpha(0.85),
                    )
                    .anchor(Anchor::Start),
                );
            }
            None => {
                scene.label(
                    Label::new(grid.point(x + 0.35, y), field.clone(), 9.0 * pt, style.text)
                        .anchor(Anchor::Start),
                );
            }
        }
    }
}

/// Stats bar with one tinted disc and a caption per benefit, spread evenly.
fn draw_benefits(scene: &mut Scene, grid: &Grid, pt: f32, style: &CardsStyle, bottom: f32) {
    let bar_width = PAGE_WIDTH - 2.0 * MARGIN;
    let origin = grid.point(MARGIN, bottom + BENEFITS_HEIGHT);
    scene.fill_and_stroke(
        Path::rounded_rect(
            origin.x,
            origin.y,
            grid.len(bar_width),
            grid.len(BENEFITS_HEIGHT),
            grid.len(0.1),
        ),
        Color::rgb(0xf5, 0xf5, 0xf5),
        Stroke::new(style.dark, pt),
    );

    let slot = bar_width / style.benefits.len() as f32;
    for (i, benefit) in style.benefits.iter().enumerate() {
        let x = MARGIN + slot * (i as f32 + 0.5);
        let disc = grid.point(x, bottom + 1.25);
        scene.fill(Path::circle(disc, grid.len(0.3)), style.accent.with_alpha(0.2));

        let icon = benefit.icon.clone().unwrap_or_else(|| (i + 1).to_string());
        scene.label(Label::new(disc, icon, 14.0 * pt, style.dark).bold());
        scene.label(Label::new(
            grid.point(x, bottom + 0.5),
            benefit.text.clone(),
            11.0 * pt,
            style.dark,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Item;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_columns_narrow_small_cards() {
        let columns = card_columns(&[6, 5, 4, 2], 18.8, 0.2);
        assert_eq!(columns.len(), 4);

        let widths: Vec<f32> = columns.iter().map(|c| c.1).collect();
        assert!(approx(widths[0], widths[1]));
        assert!(approx(widths[3], widths[0] * 0.8));

        let (last_x, last_w) = columns[3];
        assert!(approx(last_x + last_w, 18.8));
    }

    #[test]
    fn test_columns_are_separated_by_gap() {
        let columns = card_columns(&[3, 3, 3], 10.0, 0.5);
        for pair in columns.windows(2) {
            assert!(approx(pair[0].0 + pair[0].1 + 0.5, pair[1].0));
        }
    }

    #[test]
    fn test_card_height_grows_with_fields() {
        assert_eq!(card_height(6), MIN_CARD_HEIGHT);
        assert!(card_height(12) > MIN_CARD_HEIGHT);
    }

    #[test]
    fn test_fields_with_description_render_two_lines() {
        let cards = vec![Card {
            title: "Transactions".to_string(),
            count: 2.0,
            fields: vec![
                "TRANSACTION_DATES: Match payments to invoice dates".to_string(),
                "TRANSACTION_AMOUNTS_PAID".to_string(),
            ],
            color: Color::rgb(0xff, 0xd9, 0x3d),
            icon: None,
        }];
        let style = CardsStyle {
            title: "17 CRITICAL FIELDS".to_string(),
            summary: vec!["Automated Validation".to_string()],
            ..CardsStyle::default()
        };
        let scene = build_cards_scene(&cards, &style);

        assert!(scene.labels().any(|l| l.text == "TRANSACTION_DATES:" && l.bold));
        assert!(scene.labels().any(|l| l.text == "Match payments to invoice dates"));
        assert!(scene.labels().any(|l| l.text == "TRANSACTION_AMOUNTS_PAID"));
        assert!(scene.labels().any(|l| l.text == "1"));
        assert!(scene.labels().any(|l| l.text == "Automated Validation"));
    }

    #[test]
    fn test_default_page_is_twenty_by_seven() {
        let cards = vec![Card {
            title: "General".to_string(),
            count: 6.0,
            fields: vec!["A".to_string(); 6],
            color: Color::BLACK,
            icon: None,
        }];
        let scene = build_cards_scene(&cards, &CardsStyle::default());
        assert_eq!(scene.width, 1600);
        assert_eq!(scene.height, 560);
    }

    #[test]
    fn test_benefits_row_adds_discs_and_captions() {
        let cards = vec![Card {
            title: "General".to_string(),
            count: 6.0,
            fields: vec!["A".to_string(); 6],
            color: Color::BLACK,
            icon: None,
        }];
        let style = CardsStyle {
            benefits: vec![
                Benefit {
                    icon: None,
                    text: "Automated\nValidation".to_string(),
                },
                Benefit {
                    icon: Some("A".to_string()),
                    text: "Audit Trail\nMaintenance".to_string(),
                },
            ],
            ..CardsStyle::default()
        };
        let scene = build_cards_scene(&cards, &style);

        // the bar and its gap push the cards up by two units
        assert_eq!(scene.height, 720);

        let caption = scene.labels().find(|l| l.text == "Automated\nValidation").unwrap();
        assert_eq!(caption.lines().count(), 2);
        assert!(scene.labels().any(|l| l.text == "A" && l.bold));

        let accent = CardsStyle::default().accent.with_alpha(0.2);
        let discs = scene
            .items
            .iter()
            .filter(|i| matches!(i, Item::Shape { fill: Some(c), .. } if *c == accent))
            .count();
        assert_eq!(discs, 2);
    }
}
