//! Text layer rendering.

use image::{Rgba, RgbaImage};

use crate::fonts::FontHandle;
use crate::units::Rgb;

/// Fixed text translucency: 60% of full opacity.
pub const TEXT_ALPHA: u8 = 153;

/// Render `text` into a transparent layer cropped to its ink bounds.
///
/// The bounding box's top-left lands at (0, 0). Text that inks nothing
/// (including the empty string) yields a 1x1 fully transparent layer.
pub fn render_text(text: &str, font: &FontHandle, color: Rgb) -> RgbaImage {
    let Some((min_x, min_y, max_x, max_y)) = font.ink_bounds(text) else {
        return RgbaImage::new(1, 1);
    };

    let width = (max_x - min_x).max(1) as u32;
    let height = (max_y - min_y).max(1) as u32;

    let mut coverage = vec![0.0f32; width as usize * height as usize];
    font.draw(text, |x, y, c| {
        let px = x - min_x;
        let py = y - min_y;
        if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
            return;
        }
        let cell = &mut coverage[py as usize * width as usize + px as usize];
        *cell = cover(*cell, c);
    });

    let (r, g, b) = color;
    let mut layer = RgbaImage::new(width, height);
    for (pixel, c) in layer.pixels_mut().zip(&coverage) {
        let alpha = (TEXT_ALPHA as f32 * c).round() as u8;
        if alpha > 0 {
            *pixel = Rgba([r, g, b, alpha]);
        }
    }

    layer
}

/// Coverage `over` drawn on top of coverage `under`, as overlapping glyphs
/// combine.
fn cover(under: f32, over: f32) -> f32 {
    let over = over.clamp(0.0, 1.0);
    over + under * (1.0 - over)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_single_transparent_pixel() {
        let layer = render_text("", &FontHandle::builtin(20), (255, 255, 255));
        assert_eq!(layer.dimensions(), (1, 1));
        assert_eq!(layer.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_whitespace_only_is_single_transparent_pixel() {
        let layer = render_text("   ", &FontHandle::builtin(20), (255, 255, 255));
        assert_eq!(layer.dimensions(), (1, 1));
        assert_eq!(layer.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_builtin_layer_is_tight() {
        // At scale 1, '|' is one column wide and seven rows tall
        let layer = render_text("|", &FontHandle::builtin(8), (10, 20, 30));
        assert_eq!(layer.dimensions(), (1, 7));
        for pixel in layer.pixels() {
            assert_eq!(pixel, &Rgba([10, 20, 30, TEXT_ALPHA]));
        }
    }

    #[test]
    fn test_overlapping_coverage_accumulates() {
        // Two half-covered glyphs over one pixel give 75%, not 50%
        assert_eq!(cover(cover(0.0, 0.5), 0.5), 0.75);
        assert_eq!(cover(0.3, 1.0), 1.0);
        assert_eq!(cover(0.4, 0.0), 0.4);
        assert_eq!(cover(0.0, 1.7), 1.0);
    }
}
