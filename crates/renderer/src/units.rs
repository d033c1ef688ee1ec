//! Typographic unit conversion.

pub use card_common::color::{hex_to_rgb, rgb_to_hex, Rgb};

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Visual calibration applied to every field's point size before it is
/// converted to pixels. Existing template layouts depend on it.
pub const FONT_SCALE_FACTOR: f64 = 1.5;

/// Convert a point size to whole pixels at `dpi`.
///
/// Rounds half to even, so 2.5pt at 72dpi is 2px.
pub fn points_to_pixels(points: f64, dpi: f64) -> i64 {
    (points * dpi / POINTS_PER_INCH).round_ties_even() as i64
}

/// Pixel size used to load a field's font.
pub fn font_pixel_size(size_pt: f64, dpi: f64) -> i64 {
    points_to_pixels(size_pt * FONT_SCALE_FACTOR, dpi)
}
