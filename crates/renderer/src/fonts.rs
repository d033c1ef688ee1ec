//! Font resolution with graceful degradation.
//!
//! A field's logical font key is looked up in the font table and loaded as a
//! scalable TrueType/OpenType font at the field's pixel size. Any failure
//! (unknown key, unreadable file, corrupt font, degenerate size) resolves to
//! the built-in bitmap font instead of an error; the reason is carried in
//! [`FontSource::Fallback`] so callers and tests can observe it.

use rusttype::{point, Font, Point, Scale};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use card_common::FontTable;

use crate::bitmap_font::BitmapFont;
use crate::units::font_pixel_size;

/// Tight ink bounds `(min_x, min_y, max_x, max_y)`, max exclusive, relative
/// to the pen origin with y = 0 on the ascender line.
pub type InkBounds = (i32, i32, i32, i32);

/// A rasterizable font at a fixed pixel size.
#[derive(Clone)]
pub enum FontHandle {
    Scalable {
        font: Font<'static>,
        /// Rasterizer scale (ascent-to-descent height in pixels).
        scale: Scale,
        /// Requested em size in pixels.
        pixel_size: i64,
    },
    Bitmap(BitmapFont),
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::Scalable { scale, pixel_size, .. } => f
                .debug_struct("Scalable")
                .field("pixel_size", pixel_size)
                .field("scale", &scale.y)
                .finish(),
            FontHandle::Bitmap(bitmap) => f.debug_tuple("Bitmap").field(bitmap).finish(),
        }
    }
}

impl FontHandle {
    /// Parse font bytes and size them so that `pixel_size` is the em height.
    pub fn from_bytes(bytes: Vec<u8>, pixel_size: i64) -> Result<Self, FallbackReason> {
        if pixel_size <= 0 {
            return Err(FallbackReason::InvalidSize(pixel_size));
        }
        let font = Font::try_from_vec(bytes).ok_or(FallbackReason::InvalidFont)?;

        let units_per_em = font.units_per_em() as f32;
        let v = font.v_metrics_unscaled();
        let height = v.ascent - v.descent;
        if units_per_em <= 0.0 || height <= 0.0 {
            return Err(FallbackReason::InvalidFont);
        }

        let scale = Scale::uniform(pixel_size as f32 * height / units_per_em);
        Ok(FontHandle::Scalable {
            font,
            scale,
            pixel_size,
        })
    }

    /// The built-in font sized as close to `pixel_size` as it can get.
    pub fn builtin(pixel_size: i64) -> Self {
        FontHandle::Bitmap(BitmapFont::for_pixel_size(pixel_size))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Bitmap(_))
    }

    /// Pen origin putting the ascender line at y = 0.
    fn origin(font: &Font<'static>, scale: Scale) -> Point<f32> {
        point(0.0, font.v_metrics(scale).ascent)
    }

    /// Tight pixel bounds of `text`; `None` when nothing would be inked.
    pub fn ink_bounds(&self, text: &str) -> Option<InkBounds> {
        match self {
            FontHandle::Scalable { font, scale, .. } => font
                .layout(text, *scale, Self::origin(font, *scale))
                .filter_map(|g| g.pixel_bounding_box())
                .map(|bb| (bb.min.x, bb.min.y, bb.max.x, bb.max.y))
                .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))),
            FontHandle::Bitmap(bitmap) => bitmap.ink_bounds(text),
        }
    }

    /// Visit glyph coverage for `text` in the same coordinate space as
    /// [`FontHandle::ink_bounds`]. Coverage is in `0.0..=1.0`.
    pub fn draw(&self, text: &str, mut f: impl FnMut(i32, i32, f32)) {
        match self {
            FontHandle::Scalable { font, scale, .. } => {
                for glyph in font.layout(text, *scale, Self::origin(font, *scale)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            f(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage)
                        });
                    }
                }
            }
            FontHandle::Bitmap(bitmap) => bitmap.for_each_pixel(text, |x, y| f(x, y, 1.0)),
        }
    }
}

/// Why the primary font could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    UnknownKey,
    Unreadable(String),
    InvalidFont,
    InvalidSize(i64),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::UnknownKey => write!(f, "font key not in font table"),
            FallbackReason::Unreadable(e) => write!(f, "font file unreadable: {}", e),
            FallbackReason::InvalidFont => write!(f, "font data could not be parsed"),
            FallbackReason::InvalidSize(px) => write!(f, "invalid pixel size {}", px),
        }
    }
}

/// Where a resolved font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Primary { path: PathBuf },
    Fallback { reason: FallbackReason },
}

/// Result of a font lookup: always usable, with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub font: Arc<FontHandle>,
    pub source: FontSource,
}

impl ResolvedFont {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, FontSource::Fallback { .. })
    }
}

type CacheKey = (String, i64);

/// Memoizing font resolver shared by concurrent generation calls.
///
/// Concurrent misses for the same key may load the font twice; whichever
/// insert lands first wins and both callers get an equivalent font.
#[derive(Debug)]
pub struct FontCache {
    table: FontTable,
    dpi: f64,
    cache: RwLock<HashMap<CacheKey, ResolvedFont>>,
}

impl FontCache {
    pub fn new(table: FontTable, dpi: f64) -> Self {
        Self {
            table,
            dpi,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve `font_key` at `size_pt`. Never fails.
    pub fn resolve(&self, font_key: &str, size_pt: f64) -> ResolvedFont {
        let pixel_size = font_pixel_size(size_pt, self.dpi);
        let cache_key = (font_key.to_string(), pixel_size);

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(resolved) = cache.get(&cache_key) {
                return resolved.clone();
            }
        }

        let resolved = self.load(font_key, pixel_size);

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.entry(cache_key).or_insert(resolved).clone()
    }

    /// Number of memoized (key, size) entries.
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn load(&self, font_key: &str, pixel_size: i64) -> ResolvedFont {
        match self.load_primary(font_key, pixel_size) {
            Ok((font, path)) => {
                debug!(font = font_key, pixel_size, path = %path.display(), "Loaded font");
                ResolvedFont {
                    font: Arc::new(font),
                    source: FontSource::Primary { path },
                }
            }
            Err(reason) => {
                warn!(
                    font = font_key,
                    path = ?self.table.get(font_key),
                    pixel_size,
                    reason = %reason,
                    "Falling back to built-in font"
                );
                metrics::counter!("card_font_fallback_total", "font" => font_key.to_string())
                    .increment(1);
                ResolvedFont {
                    font: Arc::new(FontHandle::builtin(pixel_size)),
                    source: FontSource::Fallback { reason },
                }
            }
        }
    }

    fn load_primary(
        &self,
        font_key: &str,
        pixel_size: i64,
    ) -> Result<(FontHandle, PathBuf), FallbackReason> {
        let path = self.table.get(font_key).ok_or(FallbackReason::UnknownKey)?;
        let bytes = read_font_file(path)?;
        let font = FontHandle::from_bytes(bytes, pixel_size)?;
        Ok((font, path.to_path_buf()))
    }
}

fn read_font_file(path: &Path) -> Result<Vec<u8>, FallbackReason> {
    std::fs::read(path).map_err(|e| FallbackReason::Unreadable(e.to_string()))
}
