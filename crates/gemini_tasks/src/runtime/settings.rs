//! Host settings for the command-line runtime.

use derive_getters::Getters;
use gemini_tasks_error::{ConfigError, ConfigErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "gemini_tasks";
/// Prefix of environment variables overriding settings.
pub const ENV_PREFIX: &str = "GEMINI_TASKS";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Runtime settings.
///
/// Loaded from `gemini_tasks.toml` (optional) and `GEMINI_TASKS_*`
/// environment variables, the latter taking precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct Settings {
    /// Directory for blobs written by tasks
    storage_dir: PathBuf,
    /// Log output format
    log_format: LogFormat,
    /// Filter used when `RUST_LOG` is not set
    log_filter: String,
    /// Overrides the Gemini / Vertex AI root URL
    base_url: Option<String>,
    /// Interval between metric exports
    metrics_export_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("gemini_tasks_storage"),
            log_format: LogFormat::default(),
            log_filter: "info".to_string(),
            base_url: None,
            metrics_export_interval_secs: 60,
        }
    }
}

impl Settings {
    /// Loads settings from an explicit file or the default lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicit file is missing or any source fails
    /// to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path),
            None => config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings: Self = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ConfigError::new(ConfigErrorKind::SettingsLoad(e.to_string())))?;

        debug!(?settings, "Loaded settings");
        Ok(settings)
    }
}
