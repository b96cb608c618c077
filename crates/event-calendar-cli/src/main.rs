//! Scenario replay binary for the event calendar.
//!
//! Reads a YAML scenario (persons, events, registration steps), replays it
//! against a fresh [`Controller`](event_calendar_logic::Controller), and
//! prints a JSON report to stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `event-calendar.yaml` (or the path in
//!    `EVENT_CALENDAR_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing)
//! 3. Load the scenario named on the command line
//! 4. Replay it and print the report

mod error;
mod scenario;

use std::path::PathBuf;

use chrono::Utc;
use event_calendar_logic::CalendarConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::scenario::Scenario;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "EVENT_CALENDAR_CONFIG";

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "event-calendar.yaml";

fn main() -> Result<(), CliError> {
    let (config, config_path) = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        registration_outcome = ?config.controller.registration_outcome,
        "Controller configured"
    );

    let scenario_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(CliError::MissingScenario)?;
    let scenario = Scenario::from_file(&scenario_path)?;
    info!(
        path = %scenario_path.display(),
        persons = scenario.persons.len(),
        events = scenario.events.len(),
        steps = scenario.steps.len(),
        "Scenario loaded"
    );

    let report = scenario::replay(&scenario, config.controller, Utc::now())?;
    info!(
        events_created = report.creations.iter().filter(|c| c.created).count(),
        steps_accepted = report.steps.iter().filter(|s| s.accepted).count(),
        "Scenario replayed"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Load configuration from `EVENT_CALENDAR_CONFIG` or `event-calendar.yaml`.
///
/// Returns the path that was read, or `None` when no file exists and the
/// defaults are used.
fn load_config() -> Result<(CalendarConfig, Option<PathBuf>), CliError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = CalendarConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let mut config = CalendarConfig::default();
        config.logging.apply_env_overrides();
        Ok((config, None))
    }
}
