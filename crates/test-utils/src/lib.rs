//! Shared test utilities for the card generator workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Workspace and system font path helpers
//! - Skip macros for optional fonts
//! - Synthetic image generators
//! - A temporary asset root with templates, images and fonts
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_font, AssetFixture};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if no TrueType font is available.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_font;
///
/// #[test]
/// fn test_scalable_rendering() {
///     let path = require_font!();
///     // Test code using path...
/// }
/// ```
///
/// If no font is found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_system_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: No TrueType font found. Install DejaVu fonts or set TEST_FONT.");
                return;
            }
        }
    }};
}
