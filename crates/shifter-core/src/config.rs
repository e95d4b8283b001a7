//! Engine configuration
//!
//! Configuration is optional; every field has a default. Files are loaded by
//! extension: `.toml` through `toml`, `.json`/`.jsonc` through `json5` so
//! comments and trailing commas are accepted.
//!
//! ```toml
//! [rules]
//! "migration/paged-list-using" = "off"
//!
//! [walker]
//! parallel = true
//! minParallelChildren = 16
//!
//! [fixes]
//! maxPerDocument = 100
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::{Result, ShifterError};

/// Whether a rule takes part in walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleToggle {
    On,
    Off,
}

impl RuleToggle {
    pub fn is_on(self) -> bool {
        matches!(self, RuleToggle::On)
    }
}

/// Walker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkerConfig {
    /// Walk root children on the rayon pool
    pub parallel: bool,
    /// Root child count below which the walk stays sequential
    pub min_parallel_children: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_parallel_children: 8,
        }
    }
}

/// Fix applier settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixConfig {
    /// Stop after this many successful fixes in one document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_document: Option<usize>,
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Per-rule toggles; rules not listed are on
    pub rules: BTreeMap<String, RuleToggle>,
    pub walker: WalkerConfig,
    pub fixes: FixConfig,
}

impl EngineConfig {
    /// Check structural constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.walker.min_parallel_children == 0 {
            return Err(ShifterError::config_error(
                "walker.minParallelChildren must be at least 1",
            ));
        }
        if self.fixes.max_per_document == Some(0) {
            return Err(ShifterError::config_error(
                "fixes.maxPerDocument must be at least 1 when set",
            ));
        }
        Ok(())
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map(|toggle| toggle.is_on())
            .unwrap_or(true)
    }

    /// Turn a rule on or off
    pub fn set_rule(&mut self, rule_id: impl Into<String>, toggle: RuleToggle) {
        self.rules.insert(rule_id.into(), toggle);
    }
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a configuration file, picking the format by extension
    pub fn load_from_file(path: &Path) -> Result<EngineConfig> {
        let content = fs::read_to_string(path).map_err(|e| ShifterError::io_error(path, e))?;

        let ext = path.extension().and_then(|e| e.to_str());
        let config = match ext {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") | Some("jsonc") => Self::from_json_str(&content),
            _ => Err(ShifterError::config_error(format!(
                "Unsupported config file extension for '{}' (expected .toml, .json or .jsonc)",
                path.display()
            ))),
        }
        .map_err(|e| ShifterError::ConfigError {
            message: format!("Failed to load config from '{}': {}", path.display(), e),
        })?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ShifterError::ConfigError {
                message: format!("Invalid TOML: {e}"),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON, with comments and trailing commas allowed
    pub fn from_json_str(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig =
            json5::from_str(content).map_err(|e| ShifterError::ConfigError {
                message: format!("Invalid JSON: {e}"),
            })?;
        config.validate()?;
        Ok(config)
    }
}
