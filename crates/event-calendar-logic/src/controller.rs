//! The event registry and its registration rules.
//!
//! The [`Controller`] owns every [`Event`] and enforces the rules that span
//! entities: unique titles, no events in the past, and resolving any event
//! handed in by a caller to the stored instance before touching it.
//!
//! # Event keys
//!
//! Operations that take an `Option<&EventKey>` only read its title and then
//! look the stored event up again. Callers obtain keys with [`Event::key`]
//! on an event from [`Controller::get_event`]. A key cannot register
//! anyone, so the stored events are the only place participators change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use event_calendar_entities::{AdmissionPolicy, Event, EventKey, Person};

use crate::clock::{Clock, SystemClock};
use crate::config::{ControllerConfig, RegistrationOutcome};
use crate::error::ControllerError;

/// Registry of events keyed by title, in creation order.
#[derive(Debug)]
pub struct Controller {
    /// All events, in creation order. Events are never removed.
    events: Vec<Event>,
    /// Title to position in `events`.
    by_title: BTreeMap<String, usize>,
    clock: Box<dyn Clock>,
    config: ControllerConfig,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Create an empty controller using the system clock and default
    /// configuration.
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default(), SystemClock)
    }

    /// Create an empty controller that reads "now" from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_config(ControllerConfig::default(), clock)
    }

    /// Create an empty controller with explicit configuration and clock.
    pub fn with_config(config: ControllerConfig, clock: impl Clock + 'static) -> Self {
        Self {
            events: Vec::new(),
            by_title: BTreeMap::new(),
            clock: Box::new(clock),
            config,
        }
    }

    /// Return the active configuration.
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Return the number of events in the registry.
    pub fn events_count(&self) -> usize {
        self.events.len()
    }

    /// Iterate over all events in creation order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Create an event titled `title` on `date_time`, invited by `invitor`.
    ///
    /// A `max_participators` of `0` creates an unlimited event; any other
    /// value caps the number of participators.
    ///
    /// Returns `Ok(false)` without changing the registry if the invitor is
    /// missing, the title is empty or already taken (exact match), or the
    /// date lies before the clock's current moment.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::MissingDateTime`] if `date_time` is `None`.
    pub fn create_event(
        &mut self,
        invitor: Option<&Person>,
        title: &str,
        date_time: Option<DateTime<Utc>>,
        max_participators: u32,
    ) -> Result<bool, ControllerError> {
        let Some(date_time) = date_time else {
            return Err(ControllerError::MissingDateTime);
        };

        let rejection = if invitor.is_none() {
            Some("missing invitor")
        } else if title.is_empty() {
            Some("empty title")
        } else if self.by_title.contains_key(title) {
            Some("title already used")
        } else if date_time < self.clock.now() {
            Some("date in the past")
        } else {
            None
        };

        let (Some(invitor), None) = (invitor, rejection) else {
            tracing::debug!(
                title,
                reason = rejection.unwrap_or_default(),
                "event creation rejected"
            );
            return Ok(false);
        };

        let admission = AdmissionPolicy::from_limit(max_participators);
        let event = Event::with_admission(invitor.clone(), title, date_time, admission);
        tracing::info!(
            title,
            id = %event.id(),
            invitor = %invitor.id(),
            %date_time,
            max_participators = ?admission.max_participators(),
            "event created"
        );

        self.by_title.insert(title.to_owned(), self.events.len());
        self.events.push(event);
        Ok(true)
    }

    /// Return the event with exactly this title.
    pub fn get_event(&self, title: &str) -> Option<&Event> {
        self.by_title
            .get(title)
            .and_then(|&index| self.events.get(index))
    }

    fn get_event_mut(&mut self, title: &str) -> Option<&mut Event> {
        let index = *self.by_title.get(title)?;
        self.events.get_mut(index)
    }

    /// Register `person` for the stored event with the title in `event`.
    ///
    /// Returns `false` if either argument is missing or no event with that
    /// title exists. Otherwise the result depends on
    /// [`ControllerConfig::registration_outcome`]: with
    /// [`RegistrationOutcome::Actual`] it is whether the person was admitted,
    /// with [`RegistrationOutcome::Lenient`] it is always `true`.
    pub fn register_person_for_event(
        &mut self,
        person: Option<&Person>,
        event: Option<&EventKey>,
    ) -> bool {
        match (person, event) {
            (Some(person), Some(event)) => self.register_by_title(person, &event.title),
            _ => {
                tracing::debug!(reason = "missing person or event", "registration rejected");
                false
            }
        }
    }

    /// Register `person` for the event titled `title`.
    ///
    /// See [`Controller::register_person_for_event`] for the result.
    pub fn register_by_title(&mut self, person: &Person, title: &str) -> bool {
        let outcome = self.config.registration_outcome;
        let Some(event) = self.get_event_mut(title) else {
            tracing::debug!(title, reason = "unknown event", "registration rejected");
            return false;
        };

        let admitted = event.add_person(person);
        match outcome {
            RegistrationOutcome::Actual => admitted,
            RegistrationOutcome::Lenient => true,
        }
    }

    /// Unregister `person` from the stored event with the title in `event`.
    ///
    /// Returns `false` if either argument is missing, the event is unknown,
    /// or the person was not registered.
    pub fn unregister_person_for_event(
        &mut self,
        person: Option<&Person>,
        event: Option<&EventKey>,
    ) -> bool {
        match (person, event) {
            (Some(person), Some(event)) => self.unregister_by_title(person, &event.title),
            _ => {
                tracing::debug!(reason = "missing person or event", "unregistration rejected");
                false
            }
        }
    }

    /// Unregister `person` from the event titled `title`.
    pub fn unregister_by_title(&mut self, person: &Person, title: &str) -> bool {
        let Some(event) = self.get_event_mut(title) else {
            tracing::debug!(title, reason = "unknown event", "unregistration rejected");
            return false;
        };
        event.remove_person(person)
    }

    /// Return the participators of the stored event with the title in
    /// `event`, best-ranked first.
    ///
    /// Ranking is descending by event count, then ascending by last name,
    /// then first name. Returns `None` if `event` is missing or unknown.
    pub fn get_participators_for_event(&self, event: Option<&EventKey>) -> Option<Vec<Person>> {
        event.and_then(|event| self.participators_by_title(&event.title))
    }

    /// Return the ranked participators of the event titled `title`.
    pub fn participators_by_title(&self, title: &str) -> Option<Vec<Person>> {
        let mut participators = self.get_event(title)?.participators();
        participators.sort();
        Some(participators)
    }

    /// Return every event `person` is registered for, in creation order.
    ///
    /// Returns `None` if `person` is missing.
    pub fn get_events_for_person(&self, person: Option<&Person>) -> Option<Vec<&Event>> {
        let person = person?;
        Some(
            self.events
                .iter()
                .filter(|event| event.contains_person(person))
                .collect(),
        )
    }

    /// Return how many events `person` is registered for (`0` if missing).
    pub fn count_events_for_person(&self, person: Option<&Person>) -> usize {
        person.map_or(0, |person| {
            self.events
                .iter()
                .filter(|event| event.contains_person(person))
                .count()
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::clock::FixedClock;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn next_week() -> Option<DateTime<Utc>> {
        Some(now() + Duration::days(7))
    }

    fn controller() -> Controller {
        Controller::with_clock(FixedClock::new(now()))
    }

    fn lenient_controller() -> Controller {
        let config = ControllerConfig {
            registration_outcome: RegistrationOutcome::Lenient,
        };
        Controller::with_config(config, FixedClock::new(now()))
    }

    fn key(ctrl: &Controller, title: &str) -> Option<EventKey> {
        ctrl.get_event(title).map(Event::key)
    }

    #[test]
    fn create_unlimited_and_limited_events() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        assert!(matches!(
            ctrl.create_event(Some(&host), "Party", next_week(), 0),
            Ok(true)
        ));
        assert!(matches!(
            ctrl.create_event(Some(&host), "Dinner", next_week(), 4),
            Ok(true)
        ));
        assert_eq!(ctrl.events_count(), 2);
        assert_eq!(
            ctrl.get_event("Party").map(Event::max_participators),
            Some(None)
        );
        assert_eq!(
            ctrl.get_event("Dinner").map(Event::max_participators),
            Some(Some(4))
        );
        assert_eq!(ctrl.get_event("Party").map(|e| e.invitor().id()), Some(host.id()));
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 3), Ok(false)));
        assert_eq!(ctrl.events_count(), 1);
        assert_eq!(
            ctrl.get_event("Party").map(Event::max_participators),
            Some(None)
        );
    }

    #[test]
    fn titles_are_case_sensitive() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        assert!(matches!(ctrl.create_event(Some(&host), "party", next_week(), 0), Ok(true)));
        assert!(ctrl.get_event("PARTY").is_none());
    }

    #[test]
    fn invalid_creation_inputs_return_false() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        assert!(matches!(ctrl.create_event(None, "Party", next_week(), 0), Ok(false)));
        assert!(matches!(ctrl.create_event(Some(&host), "", next_week(), 0), Ok(false)));
        let yesterday = Some(now() - Duration::days(1));
        assert!(matches!(ctrl.create_event(Some(&host), "Party", yesterday, 0), Ok(false)));
        assert_eq!(ctrl.events_count(), 0);
    }

    #[test]
    fn event_at_current_moment_is_accepted() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        assert!(matches!(ctrl.create_event(Some(&host), "Now", Some(now()), 0), Ok(true)));
    }

    #[test]
    fn missing_date_is_a_contract_violation() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let result = ctrl.create_event(Some(&host), "Party", None, 0);
        assert!(matches!(result, Err(ControllerError::MissingDateTime)));
        let result = ctrl.create_event(None, "", None, 0);
        assert!(matches!(result, Err(ControllerError::MissingDateTime)));
        assert_eq!(ctrl.events_count(), 0);
    }

    #[test]
    fn register_resolves_key_to_stored_event() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        let party = key(&ctrl, "Party");
        assert!(party.is_some());

        assert!(ctrl.register_person_for_event(Some(&guest), party.as_ref()));
        assert_eq!(ctrl.get_event("Party").map(Event::participator_count), Some(1));
        assert_eq!(guest.event_count(), 1);
    }

    #[test]
    fn stored_event_is_the_only_place_counts_change() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 2), Ok(true)));
        let party = key(&ctrl, "Party");
        assert!(party.is_some());

        for _ in 0..3 {
            ctrl.register_person_for_event(Some(&guest), party.as_ref());
            let stored = ctrl.get_event("Party").map(|e| e.contains_person(&guest));
            assert_eq!(stored, Some(true));
            assert_eq!(guest.event_count(), 1);
            assert_eq!(ctrl.count_events_for_person(Some(&guest)), 1);
        }
    }

    #[test]
    fn register_with_missing_or_unknown_input_fails() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        let event = key(&ctrl, "Party");
        assert!(event.is_some());
        let foreign = Event::new(host, "Elsewhere", now()).key();

        assert!(!ctrl.register_person_for_event(None, event.as_ref()));
        assert!(!ctrl.register_person_for_event(Some(&guest), None));
        assert!(!ctrl.register_person_for_event(Some(&guest), Some(&foreign)));
        assert_eq!(guest.event_count(), 0);
    }

    #[test]
    fn actual_outcome_reports_rejected_registration() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        assert!(ctrl.register_by_title(&guest, "Party"));
        assert!(!ctrl.register_by_title(&guest, "Party"));
        assert_eq!(guest.event_count(), 1);
    }

    #[test]
    fn lenient_outcome_reports_success_for_known_event() {
        let mut ctrl = lenient_controller();
        let host = Person::new("Host", "Hanna");
        let a = Person::new("A", "A");
        let b = Person::new("B", "B");
        assert!(matches!(ctrl.create_event(Some(&host), "Solo", next_week(), 1), Ok(true)));
        assert!(ctrl.register_by_title(&a, "Solo"));
        assert!(ctrl.register_by_title(&a, "Solo"));
        assert!(ctrl.register_by_title(&b, "Solo"));
        assert!(!ctrl.register_by_title(&b, "Unknown"));
        assert_eq!(a.event_count(), 1);
        assert_eq!(b.event_count(), 0);
        assert_eq!(ctrl.get_event("Solo").map(Event::participator_count), Some(1));
    }

    #[test]
    fn unregister_reports_actual_result() {
        let mut ctrl = lenient_controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        assert!(matches!(ctrl.create_event(Some(&host), "Party", next_week(), 0), Ok(true)));
        let event = key(&ctrl, "Party");
        assert!(event.is_some());

        assert!(!ctrl.unregister_person_for_event(Some(&guest), event.as_ref()));
        assert!(ctrl.register_person_for_event(Some(&guest), event.as_ref()));
        assert!(ctrl.unregister_person_for_event(Some(&guest), event.as_ref()));
        assert!(!ctrl.unregister_person_for_event(Some(&guest), event.as_ref()));
        assert!(!ctrl.unregister_person_for_event(None, event.as_ref()));
        assert!(!ctrl.unregister_by_title(&guest, "Unknown"));
        assert_eq!(guest.event_count(), 0);
    }

    #[test]
    fn participators_are_ranked() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        for title in ["Main", "Side1", "Side2", "Side3"] {
            assert!(matches!(ctrl.create_event(Some(&host), title, next_week(), 0), Ok(true)));
        }
        let a = Person::new("Smith", "Anna");
        let b = Person::new("Adams", "Bert");
        let c = Person::new("Adams", "Carl");

        // a: 2 events, b: 3 events, c: 2 events
        let plan = [
            (&c, vec!["Side3"]),
            (&a, vec!["Side1"]),
            (&b, vec!["Side1", "Side2"]),
        ];
        for (person, extra) in plan {
            assert!(ctrl.register_by_title(person, "Main"));
            for title in extra {
                assert!(ctrl.register_by_title(person, title));
            }
        }

        let event = key(&ctrl, "Main");
        assert!(event.is_some());
        let ranked = ctrl.get_participators_for_event(event.as_ref());
        assert_eq!(ranked, Some(vec![b, c, a]));
    }

    #[test]
    fn participators_for_unknown_event_is_none() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let foreign = Event::new(host.clone(), "Ghost", now()).key();
        assert!(ctrl.get_participators_for_event(None).is_none());
        assert!(ctrl.get_participators_for_event(Some(&foreign)).is_none());
        assert!(ctrl.participators_by_title("Ghost").is_none());
        assert!(matches!(
            ctrl.create_event(Some(&host), "Empty", next_week(), 0),
            Ok(true)
        ));
        assert_eq!(ctrl.participators_by_title("Empty"), Some(Vec::new()));
    }

    #[test]
    fn events_for_person_in_creation_order() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        let guest = Person::new("Gast", "Georg");
        for title in ["First", "Second", "Third"] {
            assert!(matches!(ctrl.create_event(Some(&host), title, next_week(), 0), Ok(true)));
        }
        assert!(ctrl.register_by_title(&guest, "Third"));
        assert!(ctrl.register_by_title(&guest, "First"));

        let titles: Option<Vec<&str>> = ctrl
            .get_events_for_person(Some(&guest))
            .map(|events| events.into_iter().map(Event::title).collect());
        assert_eq!(titles, Some(vec!["First", "Third"]));
        assert_eq!(ctrl.count_events_for_person(Some(&guest)), 2);
        assert_eq!(
            ctrl.get_events_for_person(Some(&host)).map(|e| e.len()),
            Some(0)
        );
        assert!(ctrl.get_events_for_person(None).is_none());
        assert_eq!(ctrl.count_events_for_person(None), 0);
    }

    #[test]
    fn events_iterate_in_creation_order() {
        let mut ctrl = controller();
        let host = Person::new("Host", "Hanna");
        for title in ["b", "a", "c"] {
            assert!(matches!(ctrl.create_event(Some(&host), title, next_week(), 0), Ok(true)));
        }
        let titles: Vec<&str> = ctrl.events().map(Event::title).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }
}
