//! Persons and events for the event calendar.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for persons and events.
//! - [`person`] -- [`Person`] handles with the participator ranking order.
//! - [`event`] -- [`Event`], [`EventKey`], and [`AdmissionPolicy`] (unlimited or
//!   capacity-limited).
//! - [`error`] -- Error types for entity construction.

pub mod error;
pub mod event;
pub mod ids;
pub mod person;

// Re-export primary types at crate root.
pub use error::EntityError;
pub use event::{AdmissionPolicy, Event, EventKey};
pub use ids::{EventId, PersonId};
pub use person::Person;
