//! Service runtime configuration.

use std::path::PathBuf;
use tracing::info;

use card_common::{CardResult, TemplateRegistry};

/// Default location of the template configuration.
pub const DEFAULT_CONFIG_PATH: &str = "config/templates.yaml";

/// Where templates come from and how much work runs in parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Template YAML file (`CARD_CONFIG`).
    pub config_path: PathBuf,
    /// Root for relative asset paths (`CARD_ASSET_ROOT`); defaults to the
    /// config file's directory.
    pub asset_root: Option<PathBuf>,
    /// Concurrent generation limit (`CARD_WORKERS`); defaults to CPU count.
    pub workers: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            asset_root: None,
            workers: num_cpus::get(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty or unparsable values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            config_path: non_empty("CARD_CONFIG")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            asset_root: non_empty("CARD_ASSET_ROOT").map(PathBuf::from),
            workers: non_empty("CARD_WORKERS")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.workers),
        }
    }

    /// Load the template registry this configuration points at.
    pub fn load_registry(&self) -> CardResult<TemplateRegistry> {
        let registry = match &self.asset_root {
            Some(root) => TemplateRegistry::load_from_file_with_root(&self.config_path, root)?,
            None => TemplateRegistry::load_from_file(&self.config_path)?,
        };
        info!(
            config = %self.config_path.display(),
            templates = registry.len(),
            workers = self.workers,
            "Template registry ready"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(config.asset_root, None);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("CARD_CONFIG", "/etc/cards/templates.yaml"),
            ("CARD_ASSET_ROOT", "/srv/assets"),
            ("CARD_WORKERS", " 3 "),
        ]));
        assert_eq!(config.config_path, PathBuf::from("/etc/cards/templates.yaml"));
        assert_eq!(config.asset_root, Some(PathBuf::from("/srv/assets")));
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn test_invalid_workers_use_default() {
        let default_workers = ServiceConfig::default().workers;
        for bad in ["0", "many", ""] {
            let config = ServiceConfig::from_lookup(lookup(&[("CARD_WORKERS", bad)]));
            assert_eq!(config.workers, default_workers);
        }
    }
}
