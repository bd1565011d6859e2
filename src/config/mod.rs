//! Configuration for the brandmatch CLI and embedders.
//!
//! Configuration is loaded with precedence: CLI args > Env vars > Config file > Defaults
//!
//! # Example config file (brandmatch.toml)
//! ```toml
//! log_level = "debug"
//!
//! [catalog]
//! paths = ["data/brands.json", "data/operators.json"]
//!
//! [resolve]
//! groups = "config/match_groups.json"
//! country = "us"
//! ```
//!
//! Environment variables use the `BRANDMATCH_` prefix and `__` between
//! nesting levels, e.g. `BRANDMATCH_RESOLVE__COUNTRY=de`.

mod defaults;

pub use defaults::*;

use crate::groups::MatchGroups;
use crate::model::Catalog;
use crate::{catalog, Matcher};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Log filter for the CLI (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,
    /// Where the entity catalog comes from
    pub catalog: CatalogConfig,
    /// Resolution settings
    pub resolve: ResolveConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            catalog: CatalogConfig::default(),
            resolve: ResolveConfig::default(),
        }
    }
}

/// Catalog sources, merged in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Match-group JSON file; no group fallback when unset
    pub groups: Option<PathBuf>,
    /// Country code applied to every lookup that doesn't carry its own
    pub country: Option<String>,
}

impl MatcherConfig {
    /// Load configuration with precedence: CLI args > Env > File > Defaults
    ///
    /// # Arguments
    /// * `config_path` - Optional path to TOML config file; falls back to
    ///   `BRANDMATCH_CONFIG`, then `brandmatch.toml` if present
    /// * `overrides` - CLI overrides to apply on top
    pub fn load(config_path: Option<&str>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(MatcherConfig::default()));

        // Layer 1: Config file (missing files are skipped)
        let path = config_path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        figment = figment.merge(Toml::file(path));

        // Layer 2: Environment variables with BRANDMATCH_ prefix
        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

        // Layer 3: CLI overrides
        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().map_err(ConfigError::from)
    }

    /// Load from environment and optional config file only (no CLI overrides)
    pub fn from_env(config_path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load(config_path, ConfigOverrides::default())
    }

    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        catalog::load_catalogs(&self.catalog.paths)
    }

    pub fn load_groups(&self) -> anyhow::Result<MatchGroups> {
        match &self.resolve.groups {
            Some(path) => MatchGroups::load(path),
            None => Ok(MatchGroups::empty()),
        }
    }

    /// Load everything this config points at and build a matcher.
    pub fn build_matcher(&self) -> anyhow::Result<Matcher> {
        let catalog = self.load_catalog()?;
        let groups = self.load_groups()?;
        Ok(Matcher::build(&catalog, groups))
    }
}

/// CLI overrides that take precedence over file and env config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResolveOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}
