//! Source of "now" for date validation.
//!
//! The controller never reads the system time directly. It asks a
//! [`Clock`], which lets tests pin the current moment with [`FixedClock`].

use chrono::{DateTime, Utc};

/// Provides the current moment.
pub trait Clock: core::fmt::Debug {
    /// Return the current moment in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock that always reports `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
