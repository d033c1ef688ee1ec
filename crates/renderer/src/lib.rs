//! Raster pipeline for card generation.
//!
//! - Font resolution with a built-in bitmap fallback
//! - Tight translucent text layers
//! - Anchored rotation and alpha compositing
//! - Overlay placement
//! - RGB flattening and PNG/JPEG encoding

pub mod bitmap_font;
pub mod composite;
pub mod encode;
pub mod fonts;
pub mod overlay;
pub mod png;
pub mod text;
pub mod units;

pub use composite::{alpha_composite, place_at_anchor};
pub use encode::{encode, flatten_to_rgb, OutputFormat};
pub use fonts::{FallbackReason, FontCache, FontHandle, FontSource, ResolvedFont};
pub use overlay::{apply_overlay, load_rgba};
pub use text::{render_text, TEXT_ALPHA};
pub use units::{font_pixel_size, points_to_pixels, FONT_SCALE_FACTOR};
