//! Events and their admission policy.
//!
//! An [`Event`] is either unlimited or capacity-limited. The difference is
//! captured entirely by [`AdmissionPolicy`]: the shared registration routine
//! asks the policy whether one more participator fits before it runs the
//! duplicate check and bumps the person's event count.
//!
//! `Event` is not `Clone`: every event that holds a person also accounts
//! for that person in their event count. Callers that need to refer to an
//! event later keep its [`EventKey`] instead.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EntityError;
use crate::ids::EventId;
use crate::person::Person;

/// Whether an event accepts another participator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Any number of participators.
    Unlimited,
    /// At most `max_participators` participators.
    Limited {
        /// Upper bound on the participator count.
        max_participators: NonZeroU32,
    },
}

impl AdmissionPolicy {
    /// Build a policy from a raw limit where `0` means unlimited.
    pub const fn from_limit(max_participators: u32) -> Self {
        match NonZeroU32::new(max_participators) {
            Some(max_participators) => Self::Limited { max_participators },
            None => Self::Unlimited,
        }
    }

    /// Check whether a new participator fits given the current count.
    pub fn can_admit(self, current_count: usize) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited { max_participators } => u32::try_from(current_count)
                .is_ok_and(|count| count < max_participators.get()),
        }
    }

    /// Return the participator limit, or `None` when unlimited.
    pub const fn max_participators(self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::Limited { max_participators } => Some(max_participators.get()),
        }
    }
}

/// Read-only reference to an event: its id and title.
///
/// Carries no participators and cannot register anyone. A controller
/// resolves a key back to the stored event by title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    /// Identifier of the event the key was taken from.
    pub id: EventId,
    /// Title of the event the key was taken from.
    pub title: String,
}

/// A named, dated gathering with an invitor and registered participators.
///
/// Participators are kept in registration order and appear at most once.
#[derive(Debug)]
pub struct Event {
    id: EventId,
    invitor: Person,
    title: String,
    date_time: DateTime<Utc>,
    admission: AdmissionPolicy,
    participators: Vec<Person>,
}

impl Event {
    /// Create an event without a participator limit.
    pub fn new(invitor: Person, title: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self::with_admission(invitor, title, date_time, AdmissionPolicy::Unlimited)
    }

    /// Create an event that admits at most `max_participators` persons.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::ZeroParticipatorLimit`] if the limit is zero.
    pub fn with_participator_limit(
        invitor: Person,
        title: impl Into<String>,
        date_time: DateTime<Utc>,
        max_participators: u32,
    ) -> Result<Self, EntityError> {
        let max_participators =
            NonZeroU32::new(max_participators).ok_or(EntityError::ZeroParticipatorLimit)?;
        Ok(Self::with_admission(
            invitor,
            title,
            date_time,
            AdmissionPolicy::Limited { max_participators },
        ))
    }

    /// Create an event with an explicit admission policy.
    pub fn with_admission(
        invitor: Person,
        title: impl Into<String>,
        date_time: DateTime<Utc>,
        admission: AdmissionPolicy,
    ) -> Self {
        Self {
            id: EventId::new(),
            invitor,
            title: title.into(),
            date_time,
            admission,
            participators: Vec::new(),
        }
    }

    /// Return the event identifier.
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Return a read-only key referring to this event.
    pub fn key(&self) -> EventKey {
        EventKey {
            id: self.id,
            title: self.title.clone(),
        }
    }

    /// Return the person who created the event.
    pub const fn invitor(&self) -> &Person {
        &self.invitor
    }

    /// Return the title, unique within a controller.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Return when the event takes place.
    pub const fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    /// Return the admission policy.
    pub const fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    /// Return the participator limit, or `None` when unlimited.
    pub const fn max_participators(&self) -> Option<u32> {
        self.admission.max_participators()
    }

    /// Return the number of registered participators.
    pub fn participator_count(&self) -> usize {
        self.participators.len()
    }

    /// Return how many more persons can register, or `None` when unlimited.
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.max_participators().map(|max| {
            usize::try_from(max)
                .unwrap_or(usize::MAX)
                .saturating_sub(self.participators.len())
        })
    }

    /// Register a person.
    ///
    /// Returns `false` without side effects if the admission policy rejects
    /// another participator or the person is already registered. Otherwise
    /// the person is appended and their event count increases by one.
    pub fn add_person(&mut self, person: &Person) -> bool {
        if !self.admission.can_admit(self.participators.len()) {
            tracing::debug!(
                event = %self.title,
                person = %person.id(),
                reason = "event is full",
                "registration rejected"
            );
            return false;
        }
        if self.contains_person(person) {
            tracing::debug!(
                event = %self.title,
                person = %person.id(),
                reason = "already registered",
                "registration rejected"
            );
            return false;
        }

        self.participators.push(person.clone());
        person.record_registration();
        tracing::debug!(
            event = %self.title,
            person = %person.id(),
            participators = self.participators.len(),
            "person registered"
        );
        true
    }

    /// Unregister a person.
    ///
    /// Returns `false` if the person is not registered. Otherwise the person
    /// is removed and their event count decreases by one.
    pub fn remove_person(&mut self, person: &Person) -> bool {
        let Some(position) = self.participators.iter().position(|p| p == person) else {
            tracing::debug!(
                event = %self.title,
                person = %person.id(),
                reason = "not registered",
                "unregistration rejected"
            );
            return false;
        };

        let removed = self.participators.remove(position);
        removed.record_unregistration();
        tracing::debug!(
            event = %self.title,
            person = %person.id(),
            participators = self.participators.len(),
            "person unregistered"
        );
        true
    }

    /// Return a copy of the participators in registration order.
    pub fn participators(&self) -> Vec<Person> {
        self.participators.clone()
    }

    /// Check whether a person is registered.
    pub fn contains_person(&self, person: &Person) -> bool {
        self.participators.iter().any(|p| p == person)
    }
}
