//! Event registry and registration rules for the event calendar.
//!
//! The [`Controller`] is the only entry point callers need: it creates
//! events, registers and unregisters persons, and answers participator and
//! per-person queries. It is single-threaded by construction (persons are
//! `Rc`-backed handles); callers that need shared access must serialize
//! calls themselves.
//!
//! # Modules
//!
//! - [`controller`] -- The [`Controller`] registry.
//! - [`clock`] -- The [`Clock`] trait used to validate event dates.
//! - [`config`] -- YAML configuration ([`CalendarConfig`]).
//! - [`error`] -- [`ControllerError`] for contract violations.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;

// Re-export primary types at crate root.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CalendarConfig, ConfigError, ControllerConfig, LoggingConfig, RegistrationOutcome};
pub use controller::Controller;
pub use error::ControllerError;
