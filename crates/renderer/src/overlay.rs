//! Overlay compositing.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

use card_common::{CardError, CardResult, Overlay};

use crate::composite::{alpha_composite, premultiply, unpremultiply};

/// Load an image file as RGBA, or explain why it cannot be used.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, String> {
    if !path.is_file() {
        return Err("file does not exist".to_string());
    }
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Composite the template's overlay onto `base`.
pub fn apply_overlay(base: &mut RgbaImage, overlay: &Overlay) -> CardResult<()> {
    let image = load_rgba(overlay.path()).map_err(|reason| CardError::OverlayNotFound {
        path: overlay.path().to_path_buf(),
        reason,
    })?;

    match overlay {
        Overlay::Positioned { top_left, .. } => {
            debug!(x = top_left.0, y = top_left.1, "Applying positioned overlay");
            alpha_composite(base, &image, top_left.0, top_left.1);
        }
        Overlay::FullCover { .. } => {
            let image = if image.dimensions() != base.dimensions() {
                debug!(
                    from = ?image.dimensions(),
                    to = ?base.dimensions(),
                    "Resizing full-cover overlay"
                );
                unpremultiply(imageops::resize(
                    &premultiply(&image),
                    base.width(),
                    base.height(),
                    FilterType::CatmullRom,
                ))
            } else {
                image
            };
            alpha_composite(base, &image, 0, 0);
        }
    }

    Ok(())
}
