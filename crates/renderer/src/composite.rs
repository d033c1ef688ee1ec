//! Alpha compositing and anchored rotation.

use image::imageops;
use image::{DynamicImage, Rgba, Rgba32FImage, RgbaImage};
use imageproc::geometric_transformations::{rotate, Interpolation};

use card_common::Anchor;

/// Transparent border around the rotation scratch canvas. The bicubic
/// sampler needs one pixel before and two after each sample position, and
/// returns the default for anything closer to the border.
const ROTATION_MARGIN: u32 = 4;

/// Composite `src` over `dst` with its top-left at (`x`, `y`).
///
/// Straight (non-premultiplied) alpha, Porter-Duff "source over". Parts of
/// `src` outside `dst` are clipped; offsets may be negative.
pub fn alpha_composite(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(dst, src, x, y);
}

/// Straight 8-bit RGBA to premultiplied, normalized float RGBA.
///
/// Resampling must run on premultiplied values, otherwise the color of
/// transparent pixels bleeds into anti-aliased edges.
pub(crate) fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    let mut out = DynamicImage::ImageRgba8(image.clone()).into_rgba32f();
    for pixel in out.pixels_mut() {
        let alpha = pixel[3];
        for channel in &mut pixel.0[..3] {
            *channel *= alpha;
        }
    }
    out
}

/// Inverse of [`premultiply`], clamping resampling overshoot.
pub(crate) fn unpremultiply(mut image: Rgba32FImage) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3].clamp(0.0, 1.0);
        if alpha <= 0.0 {
            *pixel = Rgba([0.0; 4]);
            continue;
        }
        for channel in &mut pixel.0[..3] {
            *channel = (*channel / alpha).clamp(0.0, 1.0);
        }
        pixel[3] = alpha;
    }
    DynamicImage::ImageRgba32F(image).into_rgba8()
}

/// Place `layer` on `base` with its top-left at `anchor`, rotated by
/// `angle_deg` (clockwise) about that same anchor.
///
/// The layer is first placed on a transparent scratch canvas the size of
/// `base` (anything outside it is clipped). The scratch canvas is rotated
/// with bicubic resampling about the anchor, keeping its size, and then
/// composited over `base`. A zero angle still goes through the rotation and
/// is identical to a direct composite.
pub fn place_at_anchor(base: &mut RgbaImage, layer: &RgbaImage, anchor: Anchor, angle_deg: f64) {
    let (x, y) = anchor.rounded();
    let (width, height) = base.dimensions();

    let mut scratch = RgbaImage::new(width, height);
    imageops::replace(&mut scratch, layer, x, y);

    let mut padded = Rgba32FImage::new(width + 2 * ROTATION_MARGIN, height + 2 * ROTATION_MARGIN);
    let margin = ROTATION_MARGIN as i64;
    imageops::replace(&mut padded, &premultiply(&scratch), margin, margin);

    let rotated = rotate(
        &padded,
        ((x + margin) as f32, (y + margin) as f32),
        (angle_deg as f32).to_radians(),
        Interpolation::Bicubic,
        Rgba([0.0; 4]),
    );
    let cropped =
        imageops::crop_imm(&rotated, ROTATION_MARGIN, ROTATION_MARGIN, width, height).to_image();

    alpha_composite(base, &unpremultiply(cropped), 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_onto_transparent_copies_source() {
        let top = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 153]));
        let mut dst = RgbaImage::new(1, 1);
        alpha_composite(&mut dst, &top, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), &Rgba([200, 100, 50, 153]));
    }

    #[test]
    fn test_composite_translucent_over_opaque() {
        let top = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 153]));
        let mut dst = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        alpha_composite(&mut dst, &top, 0, 0);

        // 255 * 0.6 = 153
        let out = dst.get_pixel(0, 0);
        assert_eq!(out[3], 255);
        assert!(out[0].abs_diff(153) <= 1, "got {:?}", out);
    }

    #[test]
    fn test_composite_opaque_top_replaces() {
        let top = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        let mut dst = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 100]));
        alpha_composite(&mut dst, &top, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_composite_clips_negative_offset() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
        alpha_composite(&mut dst, &src, -2, -2);

        assert_eq!(dst.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(dst.get_pixel(0, 1), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_composite_entirely_outside_is_noop() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let before = dst.clone();
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        alpha_composite(&mut dst, &src, 10, 1);
        alpha_composite(&mut dst, &src, 1, -5);
        assert_eq!(dst, before);
    }

    #[test]
    fn test_premultiply_round_trip_is_exact() {
        let mut image = RgbaImage::new(256, 3);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let value = x as u8;
            *pixel = match y {
                0 => Rgba([value, 255 - value, 128, 153]),
                1 => Rgba([237, 239, 234, value.max(1)]),
                _ => Rgba([value, value, value, 255]),
            };
        }
        assert_eq!(unpremultiply(premultiply(&image)), image);
    }

    #[test]
    fn test_unpremultiply_zero_alpha_is_transparent() {
        let mut image = Rgba32FImage::new(1, 1);
        image.put_pixel(0, 0, Rgba([0.3, 0.2, 0.1, 0.0]));
        assert_eq!(unpremultiply(image).get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }
}
