//! RGBA color type.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` or one of `white`, `black`,
    /// `none`, `transparent`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            "none" | "transparent" => return Some(Self::TRANSPARENT),
            _ => {}
        }

        let hex = value.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let mut parts = hex.chars().map(|c| {
                    let d = c.to_digit(16).unwrap_or(0) as u8;
                    d * 16 + d
                });
                Some(Self::rgb(parts.next()?, parts.next()?, parts.next()?))
            }
            6 => Some(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Same color with alpha multiplied by `alpha` (0.0..=1.0).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#4A90E2"), Some(Color::rgb(0x4a, 0x90, 0xe2)));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(
            Color::parse("#11223380"),
            Some(Color::new(0x11, 0x22, 0x33, 0x80))
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Color::parse("none"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("White"), Some(Color::WHITE));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Color::parse("4A90E2"), None);
        assert_eq!(Color::parse("#4A90E"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_with_alpha() {
        let c = Color::rgb(10, 20, 30).with_alpha(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(c.to_hex(), "#0a141e");
    }
}
