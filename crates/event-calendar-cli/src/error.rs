//! Error types for the scenario replay binary.
//!
//! [`CliError`] is the top-level error type that wraps all failure modes
//! during startup and replay, so `main` can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the `event-calendar` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: event_calendar_logic::ConfigError,
    },

    /// The controller rejected a call as a contract violation.
    #[error("controller error: {source}")]
    Controller {
        /// The underlying controller error.
        #[from]
        source: event_calendar_logic::ControllerError,
    },

    /// No scenario file was given on the command line.
    #[error("usage: event-calendar <scenario.yaml>")]
    MissingScenario,

    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    ScenarioIo {
        /// Path of the scenario file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The scenario file is not valid YAML for a scenario.
    #[error("failed to parse scenario YAML: {source}")]
    ScenarioYaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// A scenario declares the same person key twice.
    #[error("duplicate person key: {0}")]
    DuplicatePerson(String),

    /// A scenario references a person key that was never declared.
    #[error("unknown person key: {0}")]
    UnknownPerson(String),

    /// An event's day offset does not yield a representable date.
    #[error("date offset of {days} days for event {title:?} is out of range")]
    InvalidDate {
        /// Title of the offending event.
        title: String,
        /// The requested offset.
        days: i64,
    },

    /// Serializing the report failed.
    #[error("failed to serialize report: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
