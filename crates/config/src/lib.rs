#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for lapse
//!
//! Configuration is merged from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/lapse/config.toml)
//! - Environment variables

pub mod logging;

pub use logging::init_tracing;

use lapse_errors::{ConfigError, Error};
use lapse_types::ClockKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timer tree behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub clock: ClockKind,
    /// Forward nested progress into the parent's fraction
    #[serde(default)]
    pub rollup_nested: bool,
    /// Emit lifecycle events when an event sender is attached
    #[serde(default = "default_emit_events")]
    pub emit_events: bool,
}

/// Log subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            clock: ClockKind::System,
            rollup_nested: false,
            emit_events: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_emit_events() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn,lapse_timer=info".to_string()
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("lapse").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain
    /// valid TOML for this structure.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), clock = %config.timer.clock, "loaded config");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load from `path` when given, otherwise fall back to [`Config::load`]
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain values that cannot
    /// be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // LAPSE_CLOCK
        if let Ok(clock) = std::env::var("LAPSE_CLOCK") {
            self.timer.clock = clock.parse().map_err(|value| ConfigError::InvalidValue {
                field: "LAPSE_CLOCK".to_string(),
                value,
            })?;
        }

        // LAPSE_ROLLUP
        if let Ok(rollup) = std::env::var("LAPSE_ROLLUP") {
            self.timer.rollup_nested = parse_bool("LAPSE_ROLLUP", rollup)?;
        }

        // LAPSE_LOG_FILTER
        if let Ok(filter) = std::env::var("LAPSE_LOG_FILTER") {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "LAPSE_LOG_FILTER".to_string(),
                    value: filter,
                }
                .into());
            }
            self.logging.filter = filter;
        }

        // LAPSE_LOG_JSON
        if let Ok(json) = std::env::var("LAPSE_LOG_JSON") {
            self.logging.json = parse_bool("LAPSE_LOG_JSON", json)?;
        }

        Ok(())
    }
}
