//! Synthetic image generators and pixel comparison helpers.

use image::{Rgba, RgbaImage};

/// A uniformly colored image.
pub fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Opaque image whose red channel ramps left to right and green channel
/// top to bottom. Every pixel is distinct for sizes up to 256x256.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.saturating_sub(1).max(1)) as u8;
        let g = (y * 255 / height.saturating_sub(1).max(1)) as u8;
        Rgba([r, g, 96, 255])
    })
}

/// Number of pixels that differ between two equally sized images.
///
/// # Panics
///
/// Panics if the dimensions differ.
pub fn count_differing_pixels(a: &RgbaImage, b: &RgbaImage) -> usize {
    assert_eq!(a.dimensions(), b.dimensions(), "image dimensions differ");
    a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count()
}

/// Bounding box `(min_x, min_y, max_x, max_y)`, inclusive, of the pixels
/// that differ between `a` and `b`.
pub fn changed_region(a: &RgbaImage, b: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    assert_eq!(a.dimensions(), b.dimensions(), "image dimensions differ");
    let mut region: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in a.enumerate_pixels() {
        if p == b.get_pixel(x, y) {
            continue;
        }
        region = Some(match region {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_corners() {
        let img = gradient_rgba(16, 8);
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 96, 255]));
        assert_eq!(img.get_pixel(15, 7), &Rgba([255, 255, 96, 255]));
    }

    #[test]
    fn test_changed_region() {
        let a = solid_rgba(10, 10, [0, 0, 0, 255]);
        let mut b = a.clone();
        assert_eq!(changed_region(&a, &b), None);

        b.put_pixel(2, 3, Rgba([1, 0, 0, 255]));
        b.put_pixel(7, 5, Rgba([1, 0, 0, 255]));
        assert_eq!(changed_region(&a, &b), Some((2, 3, 7, 5)));
        assert_eq!(count_differing_pixels(&a, &b), 2);
    }
}
