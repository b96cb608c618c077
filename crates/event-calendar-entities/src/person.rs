//! Persons: the invitors and participators of events.
//!
//! A [`Person`] is a cheap, clonable handle. All clones share one
//! underlying record, so an event count changed through the handle stored
//! inside an event is visible through the caller's handle as well.
//!
//! The event count is only ever changed by [`Event::add_person`] and
//! [`Event::remove_person`], which keeps it equal to the number of events
//! the person is registered for.
//!
//! [`Event::add_person`]: crate::Event::add_person
//! [`Event::remove_person`]: crate::Event::remove_person

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::ids::PersonId;

/// Shared state behind a [`Person`] handle.
#[derive(Debug)]
struct PersonRecord {
    id: PersonId,
    last_name: String,
    first_name: String,
    mail_address: RefCell<String>,
    phone_number: RefCell<String>,
    event_count: Cell<u32>,
}

/// A person that can invite to events and take part in them.
///
/// Equality and hashing use the [`PersonId`] only. Ordering is the
/// participator ranking: descending by event count, then ascending by last
/// name, then ascending by first name. The id is the final tiebreak so
/// that ordering stays consistent with equality.
#[derive(Debug, Clone)]
pub struct Person {
    record: Rc<PersonRecord>,
}

impl Person {
    /// Create a new person with empty contact details and no events.
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            record: Rc::new(PersonRecord {
                id: PersonId::new(),
                last_name: last_name.into(),
                first_name: first_name.into(),
                mail_address: RefCell::new(String::new()),
                phone_number: RefCell::new(String::new()),
                event_count: Cell::new(0),
            }),
        }
    }

    /// Return the person's identifier.
    pub fn id(&self) -> PersonId {
        self.record.id
    }

    /// Return the last name.
    pub fn last_name(&self) -> &str {
        &self.record.last_name
    }

    /// Return the first name.
    pub fn first_name(&self) -> &str {
        &self.record.first_name
    }

    /// Return "first last" for display and logging.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.record.first_name, self.record.last_name)
    }

    /// Return the current mail address (empty if never set).
    pub fn mail_address(&self) -> String {
        self.record.mail_address.borrow().clone()
    }

    /// Replace the mail address.
    pub fn set_mail_address(&self, mail_address: impl Into<String>) {
        self.record.mail_address.replace(mail_address.into());
    }

    /// Return the current phone number (empty if never set).
    pub fn phone_number(&self) -> String {
        self.record.phone_number.borrow().clone()
    }

    /// Replace the phone number.
    pub fn set_phone_number(&self, phone_number: impl Into<String>) {
        self.record.phone_number.replace(phone_number.into());
    }

    /// Return the number of events this person is registered for.
    pub fn event_count(&self) -> u32 {
        self.record.event_count.get()
    }

    /// Count one more registration. Called by the event on admission.
    pub(crate) fn record_registration(&self) {
        let count = self.record.event_count.get();
        self.record.event_count.set(count.saturating_add(1));
    }

    /// Count one registration less. Called by the event on removal.
    pub(crate) fn record_unregistration(&self) {
        let count = self.record.event_count.get();
        self.record.event_count.set(count.saturating_sub(1));
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record.id.hash(state);
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event_count()
            .cmp(&self.event_count())
            .then_with(|| self.last_name().cmp(other.last_name()))
            .then_with(|| self.first_name().cmp(other.first_name()))
            .then_with(|| self.id().cmp(&other.id()))
    }
}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
