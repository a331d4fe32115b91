//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/blockclass/blockclass.toml`
//! 3. Local config: `--config <file>`, else `./.blockclass.toml` if present
//! 4. Environment variables: `BLOCKCLASS_*` prefix
//! 5. Command line flags (applied by the CLI)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, DEFAULT_CATEGORY};
use crate::domain::DEFAULT_PERCENTAGE_MEAN_CUTOFF;
use crate::infrastructure::scene::DEFAULT_INSTANCE_TYPE;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "BLOCKCLASS";

/// Local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".blockclass.toml";

/// Unified configuration for blockclass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Percentage of the mean group size used as cutoff (default: 60)
    pub percentage_mean_cutoff: f64,
    /// `speckle_type` marking block instances
    pub instance_type: String,
    /// Category attached to annotations
    pub category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            percentage_mean_cutoff: DEFAULT_PERCENTAGE_MEAN_CUTOFF,
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified, inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub percentage_mean_cutoff: Option<f64>,
    pub instance_type: Option<String>,
    pub category: Option<String>,
}

/// Get the XDG config directory for blockclass.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "blockclass").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("blockclass.toml"))
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

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            percentage_mean_cutoff: overlay
                .percentage_mean_cutoff
                .unwrap_or(self.percentage_mean_cutoff),
            instance_type: overlay
                .instance_type
                .clone()
                .unwrap_or_else(|| self.instance_type.clone()),
            category: overlay
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit local config; must exist when given.
    ///   Without it, `./.blockclass.toml` is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let local = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(LOCAL_CONFIG_FILE)).filter(|p| p.exists()),
        };
        let global = global_config_path().filter(|p| p.exists());

        let settings = Self::load_layers(global.as_deref(), local.as_deref())?;
        Self::apply_env_overrides(settings, None)
    }

    /// Merge defaults, then `global`, then `local`. Missing layers are skipped.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        for path in [global, local].into_iter().flatten() {
            debug!("load_layers: merging {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }
        Ok(current)
    }

    /// Apply BLOCKCLASS_* environment variables as explicit overrides.
    ///
    /// `source` replaces the process environment when given.
    pub fn apply_env_overrides(
        mut settings: Self,
        source: Option<config::Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(source),
        );

        let config = builder.build().map_err(config_err)?;

        if let Some(val) = present(config.get_float("percentage_mean_cutoff"))? {
            settings.percentage_mean_cutoff = val;
        }
        if let Some(val) = present(config.get_string("instance_type"))? {
            settings.instance_type = val;
        }
        if let Some(val) = present(config.get_string("category"))? {
            settings.category = val;
        }

        Ok(settings)
    }

    /// Override the percentage if one was given on the command line.
    pub fn with_percentage(mut self, percentage: Option<f64>) -> Self {
        if let Some(p) = percentage {
            self.percentage_mean_cutoff = p;
        }
        self
    }

    /// Reject values the analysis cannot use.
    ///
    /// Negative percentages are accepted; they yield a negative cutoff.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !self.percentage_mean_cutoff.is_finite() {
            return Err(ApplicationError::Config {
                message: format!(
                    "percentage_mean_cutoff must be a finite number, got {}",
                    self.percentage_mean_cutoff
                ),
            });
        }
        if self.instance_type.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "instance_type must not be empty".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "category must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# blockclass configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/blockclass/blockclass.toml
#   Local:  --config <file>, or ./.blockclass.toml
#   Env:    BLOCKCLASS_* environment variables
#   Flags:  analyze --percentage

# Groups with at most this percentage of the mean occurrence count are special.
# 0 makes every group typical; negative values are accepted and behave the same.
# percentage_mean_cutoff = 60

# speckle_type marking block instances (subtypes in the ':' chain match too)
# instance_type = "Objects.Other.BlockInstance"

# Category attached to annotations
# category = "Type Analysis"
"#
        .to_string()
    }
}

/// A missing key is `None`; a value that fails to parse is an error.
fn present<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
