//! Template definitions: a base image, the text fields placed on it and an
//! optional overlay composited last.

use std::path::{Path, PathBuf};

use crate::field::FieldName;

/// A point in base-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest integer pixel, ties to even.
    pub fn rounded(&self) -> (i64, i64) {
        (self.x.round_ties_even() as i64, self.y.round_ties_even() as i64)
    }
}

/// One piece of substitutable text.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: FieldName,
    /// Top-left corner of the rendered text's bounding box (not a baseline).
    pub anchor: Anchor,
    /// Logical font key, resolved through the font table.
    pub font: String,
    /// Nominal size in typographic points.
    pub size_pt: f64,
    /// Clockwise-positive rotation in degrees, applied about the anchor.
    pub angle_deg: f64,
}

/// Secondary image composited after all text fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Composited at an absolute top-left offset, native size preserved.
    Positioned { path: PathBuf, top_left: (i64, i64) },
    /// Resized to exactly the base canvas and composited at the origin.
    FullCover { path: PathBuf },
}

impl Overlay {
    pub fn path(&self) -> &Path {
        match self {
            Overlay::Positioned { path, .. } | Overlay::FullCover { path } => path,
        }
    }
}

/// A named layout binding a base image to its fields and overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub key: String,
    pub base_image: PathBuf,
    /// Declaration order; rendering follows it.
    pub fields: Vec<Field>,
    pub overlay: Option<Overlay>,
}

impl Template {
    pub fn field_names(&self) -> Vec<FieldName> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn field(&self, name: FieldName) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the template declares `name` and therefore needs a value for it.
    pub fn requires(&self, name: FieldName) -> bool {
        self.field(name).is_some()
    }
}
