use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use charter_catalog::Catalog;
use charter_core::CharterConfig;
use serde::Serialize;

pub const DEFAULT_ASSETS_ROOT: &str = "assets/Catamarans";

/// Where the desk reads its catalog and reference data from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeskSettings {
    pub assets_root: PathBuf,
    /// Overrides the directory walk when set.
    pub manifest: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub deep_link_base: Option<String>,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            manifest: None,
            config_file: None,
            deep_link_base: None,
        }
    }
}

impl DeskSettings {
    pub fn from_env() -> Self {
        Self {
            assets_root: env::var("CHARTER_ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSETS_ROOT)),
            manifest: non_empty_var("CHARTER_MANIFEST").map(PathBuf::from),
            config_file: non_empty_var("CHARTER_CONFIG_FILE").map(PathBuf::from),
            deep_link_base: non_empty_var("CHARTER_DEEP_LINK_BASE"),
        }
    }

    pub fn load_config(&self) -> Result<CharterConfig> {
        let config = match &self.config_file {
            Some(path) => CharterConfig::from_json_file(path)
                .with_context(|| format!("failed loading charter config from {}", path.display()))?,
            None => CharterConfig::default(),
        };

        match &self.deep_link_base {
            Some(base) => config
                .with_deep_link_base(base.clone())
                .context("invalid CHARTER_DEEP_LINK_BASE"),
            None => Ok(config),
        }
    }

    pub fn load_catalog(&self, config: &CharterConfig) -> Result<Catalog> {
        match &self.manifest {
            Some(path) => Catalog::from_manifest_file(path, &config.display_names)
                .with_context(|| format!("failed loading vessel manifest from {}", path.display())),
            None => Catalog::from_asset_dir(&self.assets_root, &config.display_names).with_context(
                || format!("failed scanning assets under {}", self.assets_root.display()),
            ),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
