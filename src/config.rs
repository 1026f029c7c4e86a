//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/refnet/refnet.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `REFNET_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{DepthPolicy, DEFAULT_MAX_DEPTH};

/// Unified configuration for refnet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Deepest level attached below a root (root is level 1)
    pub max_depth: u32,
    /// Which depth governs the bound: reported level or path position
    pub depth_policy: DepthPolicy,
    /// Match search text with exact case
    pub search_case_sensitive: bool,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            depth_policy: DepthPolicy::default(),
            search_case_sensitive: false,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_depth: Option<u32>,
    pub depth_policy: Option<DepthPolicy>,
    pub search_case_sensitive: Option<bool>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for refnet.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "refnet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("refnet.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            depth_policy: overlay.depth_policy.unwrap_or(self.depth_policy),
            search_case_sensitive: overlay
                .search_case_sensitive
                .unwrap_or(self.search_case_sensitive),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file given on the command line. Unlike the
    ///   global file, it must exist when given.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        if let Some(path) = local {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply REFNET_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            // Keys are flat: REFNET_MAX_DEPTH -> max_depth
            .add_source(Environment::with_prefix("REFNET").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("REFNET_MAX_DEPTH out of range: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("depth_policy") {
            settings.depth_policy = val.parse()?;
        }
        if let Ok(val) = config.get_bool("search_case_sensitive") {
            settings.search_case_sensitive = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML, in the format of the config files.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unspecified_values() {
        let base = Settings::default();
        let overlay = RawSettings {
            max_depth: Some(3),
            ..RawSettings::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.max_depth, 3);
        assert_eq!(merged.depth_policy, DepthPolicy::Reported);
        assert!(merged.color);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let settings = Settings {
            max_depth: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
