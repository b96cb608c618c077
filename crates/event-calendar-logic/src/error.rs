//! Error types for the `event-calendar-logic` crate.
//!
//! Business-rule failures (duplicate title, past date, full event, ...) are
//! not errors: controller operations report them as `false` or `None`.
//! [`ControllerError`] is reserved for calls that break the API contract.

/// Contract violations raised by the [`Controller`](crate::Controller).
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// `create_event` was called without any date/time value.
    #[error("event date/time must be provided")]
    MissingDateTime,
}
