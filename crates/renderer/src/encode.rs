//! Final flattening and byte encoding of a composed card.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, RgbImage, RgbaImage};

use card_common::{CardError, CardResult};

use crate::png::create_png_rgb;

/// Default JPEG quality when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output container for generated cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless, color type 2 (RGB, 8 bits per channel).
    #[default]
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn jpeg() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::jpeg()),
            other => Err(format!("unsupported output format '{}'", other)),
        }
    }
}

/// Drop the alpha channel. Color values are kept as-is, not blended
/// against any background.
pub fn flatten_to_rgb(image: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(image).into_rgb8()
}

/// Encode an RGB image in the requested format.
pub fn encode(image: &RgbImage, format: OutputFormat) -> CardResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    match format {
        OutputFormat::Png => create_png_rgb(image.as_raw(), width as usize, height as usize)
            .map_err(CardError::Encode),
        OutputFormat::Jpeg { quality } => {
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode(
                image.as_raw(),
                width,
                height,
                ColorType::Rgb8,
            )?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_flatten_drops_alpha() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 0, Rgba([40, 50, 60, 0]));

        let rgb = flatten_to_rgb(rgba);
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(rgb.get_pixel(1, 0).0, [40, 50, 60]);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::jpeg());
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::jpeg().extension(), "jpg");
    }

    #[test]
    fn test_jpeg_magic() {
        let rgb = RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]));
        let bytes = encode(&rgb, OutputFormat::jpeg()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
