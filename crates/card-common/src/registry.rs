//! Template registry loader.
//!
//! Loads the template catalog and font-family table from a single YAML file.
//! The registry is built once at startup and is read-only afterwards; every
//! field record is validated here so the pipeline never inspects loosely
//! typed configuration at request time.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::color::{hex_to_rgb, Rgb};
use crate::error::{CardError, CardResult};
use crate::field::FieldName;
use crate::template::{Anchor, Field, Overlay, Template};

/// Rendering resolution assumed when the config does not name one.
pub const DEFAULT_DPI: f64 = 72.0;

/// Upper bound on a field's font size in points.
pub const MAX_SIZE_PT: f64 = 1000.0;

/// Logical font key -> font file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontTable {
    paths: BTreeMap<String, PathBuf>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(key.into(), path.into());
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.paths.get(key).map(|p| p.as_path())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.paths.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Kind of asset referenced by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    BaseImage,
    Overlay,
    Font,
}

/// A referenced file that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    /// Template key, or the font key for fonts.
    pub owner: String,
    pub kind: AssetKind,
    pub path: PathBuf,
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AssetKind::BaseImage => "base image",
            AssetKind::Overlay => "overlay",
            AssetKind::Font => "font",
        };
        write!(f, "{} for '{}' not found: {}", kind, self.owner, self.path.display())
    }
}

// ============================================================================
// YAML Parsing Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct YamlConfigFile {
    text_color: String,
    #[serde(default = "default_dpi")]
    dpi: f64,
    #[serde(default)]
    fonts: BTreeMap<String, PathBuf>,
    templates: BTreeMap<String, YamlTemplate>,
}

fn default_dpi() -> f64 {
    DEFAULT_DPI
}

#[derive(Debug, Deserialize)]
struct YamlTemplate {
    base_image: PathBuf,
    fields: Vec<YamlField>,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    overlay: Option<YamlOverlay>,
}

#[derive(Debug, Deserialize)]
struct YamlField {
    name: String,
    top_left: [f64; 2],
    font: String,
    size_pt: f64,
    #[serde(default)]
    angle_deg: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum YamlOverlay {
    Positioned { path: PathBuf, top_left: [i64; 2] },
    FullCover { path: PathBuf },
}

// ============================================================================
// Registry
// ============================================================================

/// Process-wide catalog of templates plus the shared render settings.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
    fonts: FontTable,
    text_color: Rgb,
    dpi: f64,
}

impl TemplateRegistry {
    /// Load a registry file; relative asset paths resolve against the
    /// file's own directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CardResult<Self> {
        let path = path.as_ref();
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::load_from_file_with_root(path, root)
    }

    /// Load a registry file, resolving relative asset paths against `asset_root`.
    pub fn load_from_file_with_root<P: AsRef<Path>, R: AsRef<Path>>(
        path: P,
        asset_root: R,
    ) -> CardResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            CardError::Config(format!(
                "failed to read registry file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let registry = Self::from_yaml_str(&contents, asset_root)?;
        info!(
            path = %path.as_ref().display(),
            templates = registry.len(),
            fonts = registry.fonts.len(),
            "Template registry loaded"
        );
        Ok(registry)
    }

    /// Parse and validate registry YAML.
    pub fn from_yaml_str<R: AsRef<Path>>(yaml: &str, asset_root: R) -> CardResult<Self> {
        let root = asset_root.as_ref();
        let file: YamlConfigFile = serde_yaml::from_str(yaml)?;

        let text_color = hex_to_rgb(&file.text_color)?;

        if !file.dpi.is_finite() || file.dpi <= 0.0 {
            return Err(CardError::Config(format!("dpi must be positive, got {}", file.dpi)));
        }

        let mut fonts = FontTable::new();
        for (key, path) in file.fonts {
            fonts.insert(key, resolve(root, &path));
        }

        let mut templates = BTreeMap::new();
        for (key, yaml) in file.templates {
            let template = build_template(&key, yaml, root, &fonts)?;
            templates.insert(key, template);
        }

        if templates.is_empty() {
            return Err(CardError::Config("registry declares no templates".to_string()));
        }

        Ok(Self {
            templates,
            fonts,
            text_color,
            dpi: file.dpi,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }

    /// Template keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.templates.keys().map(|k| k.as_str()).collect()
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// The single global text color.
    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Check that every referenced file exists.
    ///
    /// Nothing calls this implicitly; missing files are otherwise only
    /// discovered when a template is generated.
    pub fn verify_assets(&self) -> Vec<MissingAsset> {
        let mut missing = Vec::new();

        for template in self.templates.values() {
            if !template.base_image.is_file() {
                missing.push(MissingAsset {
                    owner: template.key.clone(),
                    kind: AssetKind::BaseImage,
                    path: template.base_image.clone(),
                });
            }
            if let Some(overlay) = &template.overlay {
                if !overlay.path().is_file() {
                    missing.push(MissingAsset {
                        owner: template.key.clone(),
                        kind: AssetKind::Overlay,
                        path: overlay.path().to_path_buf(),
                    });
                }
            }
        }

        for (key, path) in self.fonts.iter() {
            if !path.is_file() {
                missing.push(MissingAsset {
                    owner: key.to_string(),
                    kind: AssetKind::Font,
                    path: path.to_path_buf(),
                });
            }
        }

        missing
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn build_template(
    key: &str,
    yaml: YamlTemplate,
    root: &Path,
    fonts: &FontTable,
) -> CardResult<Template> {
    if yaml.fields.is_empty() {
        return Err(CardError::Config(format!("template '{}' declares no fields", key)));
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(yaml.fields.len());

    for (index, f) in yaml.fields.into_iter().enumerate() {
        let name: FieldName = f.name.parse().map_err(|e| {
            CardError::Config(format!("template '{}' field #{}: {}", key, index, e))
        })?;

        if !seen.insert(name) {
            return Err(CardError::Config(format!(
                "template '{}' declares field {} more than once",
                key, name
            )));
        }
        if !f.size_pt.is_finite() || f.size_pt <= 0.0 || f.size_pt > MAX_SIZE_PT {
            return Err(CardError::Config(format!(
                "template '{}' field {}: size_pt must be in (0, {}], got {}",
                key, name, MAX_SIZE_PT, f.size_pt
            )));
        }
        if !f.top_left.iter().all(|v| v.is_finite()) || !f.angle_deg.is_finite() {
            return Err(CardError::Config(format!(
                "template '{}' field {}: anchor and angle must be finite",
                key, name
            )));
        }
        if !fonts.contains(&f.font) {
            warn!(template = key, field = %name, font = %f.font, "Font key not in font table, fallback font will be used");
        }

        fields.push(Field {
            name,
            anchor: Anchor::new(f.top_left[0], f.top_left[1]),
            font: f.font,
            size_pt: f.size_pt,
            angle_deg: f.angle_deg,
        });
    }

    let overlay = yaml.overlay.map(|o| match o {
        YamlOverlay::Positioned { path, top_left } => Overlay::Positioned {
            path: resolve(root, &path),
            top_left: (top_left[0], top_left[1]),
        },
        YamlOverlay::FullCover { path } => Overlay::FullCover {
            path: resolve(root, &path),
        },
    });

    Ok(Template {
        key: key.to_string(),
        base_image: resolve(root, &yaml.base_image),
        fields,
        overlay,
    })
}
