//! Configuration loading and typed config structures for the event calendar.
//!
//! The configuration lives in a YAML file (by default `event-calendar.yaml`).
//! Every section and field is optional and falls back to the defaults
//! documented on the struct fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "EVENT_CALENDAR_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// Controller behaviour.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CalendarConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `EVENT_CALENDAR_LOG` environment variable overrides
    /// `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// What `register_person_for_event` reports once the event is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// Report whether the person was actually admitted.
    #[default]
    Actual,
    /// Report success whenever the event exists, even if the person was
    /// already registered or the event was full.
    Lenient,
}

/// Controller configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ControllerConfig {
    /// Result reporting for registrations (`actual` or `lenient`).
    #[serde(default)]
    pub registration_outcome: RegistrationOutcome,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `EVENT_CALENDAR_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}
