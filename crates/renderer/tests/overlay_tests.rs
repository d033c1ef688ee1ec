//! Tests for overlay placement.

use card_common::{CardError, Overlay};
use image::Rgba;
use renderer::overlay::{apply_overlay, load_rgba};
use std::path::PathBuf;
use test_utils::{changed_region, solid_rgba, temp_test_dir};

const BASE: [u8; 4] = [20, 30, 60, 255];

fn write_overlay(dir: &tempfile::TempDir, name: &str, w: u32, h: u32, color: [u8; 4]) -> PathBuf {
    let path = dir.path().join(name);
    solid_rgba(w, h, color).save(&path).unwrap();
    path
}

// ============================================================================
// Positioned
// ============================================================================

#[test]
fn test_positioned_overlay_keeps_native_size() {
    let dir = temp_test_dir();
    let path = write_overlay(&dir, "sticker.png", 20, 10, [200, 40, 40, 255]);

    let mut base = solid_rgba(100, 80, BASE);
    let before = base.clone();
    apply_overlay(
        &mut base,
        &Overlay::Positioned {
            path,
            top_left: (30, 40),
        },
    )
    .unwrap();

    assert_eq!(changed_region(&before, &base), Some((30, 40, 49, 49)));
    assert_eq!(base.get_pixel(30, 40), &Rgba([200, 40, 40, 255]));
}

#[test]
fn test_positioned_overlay_clips_at_edges() {
    let dir = temp_test_dir();
    let path = write_overlay(&dir, "sticker.png", 20, 10, [200, 40, 40, 255]);

    let mut base = solid_rgba(100, 80, BASE);
    apply_overlay(
        &mut base,
        &Overlay::Positioned {
            path,
            top_left: (90, 75),
        },
    )
    .unwrap();

    assert_eq!(base.dimensions(), (100, 80));
    assert_eq!(base.get_pixel(99, 79), &Rgba([200, 40, 40, 255]));
    assert_eq!(base.get_pixel(89, 79), &Rgba(BASE));
}

#[test]
fn test_overlay_transparency_respected() {
    let dir = temp_test_dir();
    let path = write_overlay(&dir, "clear.png", 10, 10, [255, 255, 255, 0]);

    let mut base = solid_rgba(20, 20, BASE);
    let before = base.clone();
    apply_overlay(
        &mut base,
        &Overlay::Positioned {
            path,
            top_left: (0, 0),
        },
    )
    .unwrap();
    assert_eq!(base, before);
}

// ============================================================================
// Full cover
// ============================================================================

#[test]
fn test_full_cover_overlay_is_resized_to_base() {
    let dir = temp_test_dir();
    let path = write_overlay(&dir, "frame.png", 10, 8, [0, 255, 0, 255]);

    let mut base = solid_rgba(100, 80, BASE);
    apply_overlay(&mut base, &Overlay::FullCover { path }).unwrap();

    for (x, y) in [(0, 0), (99, 0), (0, 79), (99, 79), (50, 40)] {
        let pixel = base.get_pixel(x, y);
        assert!(pixel[1] >= 250 && pixel[0] <= 5, "({}, {}) = {:?}", x, y, pixel);
    }
}

#[test]
fn test_full_cover_overlay_same_size_blends() {
    let dir = temp_test_dir();
    let path = write_overlay(&dir, "tint.png", 40, 30, [255, 255, 255, 128]);

    let mut base = solid_rgba(40, 30, [0, 0, 0, 255]);
    apply_overlay(&mut base, &Overlay::FullCover { path }).unwrap();

    let pixel = base.get_pixel(20, 15);
    assert_eq!(pixel[3], 255);
    assert!(pixel[0].abs_diff(128) <= 1, "got {:?}", pixel);
}

#[test]
fn test_full_cover_resize_has_no_dark_fringe() {
    let dir = temp_test_dir();
    // Opaque white left half, transparent black right half
    let mut frame = image::RgbaImage::new(10, 10);
    for (x, _, pixel) in frame.enumerate_pixels_mut() {
        if x < 5 {
            *pixel = Rgba([255, 255, 255, 255]);
        }
    }
    let path = dir.path().join("half.png");
    frame.save(&path).unwrap();

    let mut base = solid_rgba(40, 40, [255, 255, 255, 255]);
    apply_overlay(&mut base, &Overlay::FullCover { path }).unwrap();

    let darkest = base.pixels().map(|p| p[0]).min().unwrap();
    assert!(darkest >= 254, "darkest red {}", darkest);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_overlay_is_reported_with_path() {
    let dir = temp_test_dir();
    let path = dir.path().join("missing.png");

    let mut base = solid_rgba(10, 10, BASE);
    let err = apply_overlay(&mut base, &Overlay::FullCover { path: path.clone() }).unwrap_err();

    match err {
        CardError::OverlayNotFound { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_corrupt_overlay_is_reported() {
    let dir = temp_test_dir();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let mut base = solid_rgba(10, 10, BASE);
    let before = base.clone();
    let err = apply_overlay(
        &mut base,
        &Overlay::Positioned {
            path,
            top_left: (0, 0),
        },
    )
    .unwrap_err();

    assert_eq!(err.code(), "OverlayNotFound");
    assert_eq!(base, before);
}

#[test]
fn test_load_rgba_converts_rgb_sources() {
    let dir = temp_test_dir();
    let path = dir.path().join("rgb.png");
    image::RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();

    let img = load_rgba(&path).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
}
