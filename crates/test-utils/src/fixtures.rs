//! On-disk asset fixtures for generator tests.
//!
//! [`AssetFixture`] lays out a temporary asset root shaped like the shipped
//! `config/` directory: four small base images, a positioned overlay, a font
//! directory and a `templates.yaml` referencing all of them. Anchors sit well
//! inside the fixture canvas so rendered text is always visible.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::generators::solid_rgba;
use crate::paths::find_system_font;

/// Fixture base image width.
pub const FIXTURE_WIDTH: u32 = 400;
/// Fixture base image height.
pub const FIXTURE_HEIGHT: u32 = 300;
/// Opaque fill of every fixture base image.
pub const FIXTURE_BASE_COLOR: [u8; 4] = [20, 30, 60, 255];
/// Fill of the v4 overlay.
pub const FIXTURE_OVERLAY_COLOR: [u8; 4] = [200, 40, 40, 255];
/// Top-left of the v4 overlay.
pub const FIXTURE_OVERLAY_TOP_LEFT: (u32, u32) = (300, 20);
/// Size of the v4 overlay.
pub const FIXTURE_OVERLAY_SIZE: (u32, u32) = (60, 40);

pub const SAMPLE_NAME: &str = "JANE DOE";
pub const SAMPLE_ACCOUNT: &str = "4000 1234 5678 9010";
pub const SAMPLE_EXPIRATION: &str = "12/29";

/// Template configuration matching the fixture layout.
pub const FIXTURE_CONFIG: &str = r##"
text_color: "#EDEFEA"
dpi: 72

fonts:
  Card-Regular: fonts/card.ttf
  Card-SemiBold: fonts/card.ttf

templates:
  v1:
    base_image: templates/v1.png
    fields:
      - { name: NAME,       top_left: [20.4, 150.6], font: Card-SemiBold, size_pt: 18.21 }
      - { name: ACCOUNT,    top_left: [20.0, 210.0], font: Card-Regular,  size_pt: 15.65 }
      - { name: EXPIRATION, top_left: [260.0, 250.0], font: Card-Regular, size_pt: 15.65 }

  v2:
    base_image: templates/v2.png
    fields:
      - { name: NAME,       top_left: [30.0, 140.0], font: Card-SemiBold, size_pt: 15.69 }
      - { name: ACCOUNT,    top_left: [30.0, 200.0], font: Card-Regular,  size_pt: 15.14 }
      - { name: EXPIRATION, top_left: [270.0, 245.0], font: Card-Regular, size_pt: 15.14 }

  v3:
    base_image: templates/v3.png
    fields:
      - { name: NAME,       top_left: [30.0, 120.0], font: Card-SemiBold, size_pt: 18.14, angle_deg: 5.00 }
      - { name: ACCOUNT,    top_left: [25.0, 170.0], font: Card-Regular,  size_pt: 17.26, angle_deg: 5.08 }
      - { name: EXPIRATION, top_left: [250.0, 215.0], font: Card-Regular, size_pt: 17.26, angle_deg: 5.93 }

  v4:
    base_image: templates/v4.png
    overlay:
      positioned: { path: templates/v4_overlay.png, top_left: [300, 20] }
    fields:
      - { name: NAME,       top_left: [30.0, 140.0], font: Card-Regular, size_pt: 15.69 }
      - { name: ACCOUNT,    top_left: [30.0, 200.0], font: Card-Regular, size_pt: 15.14 }
      - { name: EXPIRATION, top_left: [280.0, 245.0], font: Card-Regular, size_pt: 15.14 }
"##;

/// A temporary asset root with images, fonts and a template configuration.
pub struct AssetFixture {
    dir: TempDir,
    scalable_font: bool,
}

impl AssetFixture {
    /// Build the full fixture. A system font is copied into `fonts/` when one
    /// is available; otherwise the font path stays missing and rendering uses
    /// the built-in fallback.
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("card_assets_")
            .tempdir()
            .expect("Failed to create temporary asset directory");

        let mut fixture = Self {
            dir,
            scalable_font: false,
        };

        for key in ["v1", "v2", "v3", "v4"] {
            fixture.write_image(
                &format!("templates/{}.png", key),
                &solid_rgba(FIXTURE_WIDTH, FIXTURE_HEIGHT, FIXTURE_BASE_COLOR),
            );
        }
        let (ow, oh) = FIXTURE_OVERLAY_SIZE;
        fixture.write_image(
            "templates/v4_overlay.png",
            &solid_rgba(ow, oh, FIXTURE_OVERLAY_COLOR),
        );

        std::fs::create_dir_all(fixture.path("fonts")).expect("Failed to create fonts dir");
        if let Some(font) = find_system_font() {
            std::fs::copy(&font, fixture.path("fonts/card.ttf")).expect("Failed to copy font");
            fixture.scalable_font = true;
        }

        fixture.write_config(FIXTURE_CONFIG);
        fixture
    }

    /// Asset root directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of an asset relative to the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Path of `templates.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.path("templates.yaml")
    }

    /// Whether `fonts/card.ttf` holds a real font.
    pub fn has_scalable_font(&self) -> bool {
        self.scalable_font
    }

    /// Replace `templates.yaml`.
    pub fn write_config(&self, yaml: &str) {
        std::fs::write(self.config_path(), yaml).expect("Failed to write fixture config");
    }

    /// Save an image as PNG, creating parent directories.
    pub fn write_image(&self, relative: &str, image: &RgbaImage) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        image.save(&path).expect("Failed to write fixture image");
    }

    /// Delete an asset to simulate a missing file.
    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path(relative)).expect("Failed to remove fixture asset");
    }
}

impl Default for AssetFixture {
    fn default() -> Self {
        Self::new()
    }
}
