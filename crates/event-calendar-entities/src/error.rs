//! Error types for the `event-calendar-entities` crate.

/// Errors that can occur while constructing calendar entities.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// A capacity-limited event was requested with a limit of zero.
    #[error("participator limit must be greater than zero")]
    ZeroParticipatorLimit,
}
