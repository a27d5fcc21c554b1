pub mod color;
pub mod raster;
pub mod scene;
pub mod text;
pub mod vector;

use crate::utils::error::{InfographicError, Result};
use scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = InfographicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(InfographicError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: png, svg".to_string(),
            }),
        }
    }
}

pub fn encode(scene: &Scene, format: ImageFormat, scale: f32) -> Result<Vec<u8>> {
    match format {
        ImageFormat::Png => raster::render_png(scene, scale),
        ImageFormat::Svg => Ok(vector::render_svg(scene, scale).into_bytes()),
    }
}
