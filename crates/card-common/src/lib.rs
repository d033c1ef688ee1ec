//! Common types shared by the card renderer and generator service.

pub mod color;
pub mod error;
pub mod field;
pub mod registry;
pub mod template;

pub use color::{hex_to_rgb, rgb_to_hex, Rgb};
pub use error::{CardError, CardResult};
pub use field::{FieldName, FieldValues};
pub use registry::{AssetKind, FontTable, MissingAsset, TemplateRegistry, DEFAULT_DPI, MAX_SIZE_PT};
pub use template::{Anchor, Field, Overlay, Template};
