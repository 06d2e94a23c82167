//! Configuration System
//!
//! Controller settings with file and environment-variable layering.
//! A TOML file (explicit path, or the platform config directory) provides
//! the base; `GITDECK_*` environment variables override individual fields.

use crate::error::ControlError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which operation kinds are gated behind a confirmation dialog.
///
/// Fetch, pull, and stash-save are treated as non-destructive and never
/// prompt. Push publishes history and stash-pop rewrites the working tree,
/// so both prompt by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default = "default_true")]
    pub push: bool,

    #[serde(default = "default_true")]
    pub stash_pop: bool,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        ConfirmationConfig {
            push: true,
            stash_pop: true,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ControllerConfig {
    /// Confirmation policy toggles
    #[serde(default)]
    pub confirmations: ConfirmationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Suppression store location. `None` selects the platform default
    /// data directory.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl ControllerConfig {
    /// Load configuration, layering an optional TOML file under `GITDECK_*`
    /// environment overrides (e.g. `GITDECK_CONFIRMATIONS__PUSH=false`).
    ///
    /// With no explicit path, the platform config directory is consulted
    /// and missing files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ControlError> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                if let Some(default_path) = default_config_file() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("GITDECK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Resolved suppression store path: the configured one, or the platform
    /// data directory.
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings_path.clone().or_else(default_settings_path)
    }
}

fn default_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "gitdeck", "gitdeck")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "gitdeck", "gitdeck")
        .map(|dirs| dirs.data_dir().join("settings"))
}
