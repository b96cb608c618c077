//! Scenario files and their replay against a [`Controller`].
//!
//! A scenario declares persons (by key), events relative to "now", and a
//! list of register/unregister steps. [`replay`] runs it against a fresh
//! controller and collects a serializable [`Report`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use event_calendar_entities::{EventId, Person};
use event_calendar_logic::{Controller, ControllerConfig, FixedClock};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// A scenario as read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Persons available to the scenario.
    #[serde(default)]
    pub persons: Vec<PersonDecl>,
    /// Events to create, in order.
    #[serde(default)]
    pub events: Vec<EventDecl>,
    /// Registration steps, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A person declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonDecl {
    /// Key used by events and steps to refer to this person.
    pub key: String,
    /// Last name.
    pub last_name: String,
    /// First name.
    pub first_name: String,
    /// Optional mail address.
    #[serde(default)]
    pub mail_address: Option<String>,
    /// Optional phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// An event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventDecl {
    /// Key of the inviting person.
    pub invitor: String,
    /// Event title.
    pub title: String,
    /// Days from now until the event (negative means in the past).
    pub starts_in_days: i64,
    /// Participator limit, `0` or absent for unlimited.
    #[serde(default)]
    pub max_participators: u32,
}

/// A single registration change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Register a person for an event.
    Register {
        /// Person key.
        person: String,
        /// Event title.
        event: String,
    },
    /// Unregister a person from an event.
    Unregister {
        /// Person key.
        person: String,
        /// Event title.
        event: String,
    },
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ScenarioIo`] if the file cannot be read, or
    /// [`CliError::ScenarioYaml`] if it is not a valid scenario.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ScenarioYaml`] if the string is not a valid scenario.
    pub fn parse(yaml: &str) -> Result<Self, CliError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Outcome of replaying a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Whether each declared event was created.
    pub creations: Vec<CreationReport>,
    /// Result of each step.
    pub steps: Vec<StepReport>,
    /// Every stored event with its ranked participators.
    pub events: Vec<EventReport>,
    /// Every declared person with their events.
    pub persons: Vec<PersonReport>,
}

/// Result of one event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationReport {
    /// Event title.
    pub title: String,
    /// Whether the controller accepted it.
    pub created: bool,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// The step as declared.
    #[serde(flatten)]
    pub step: Step,
    /// Whether the controller accepted it.
    pub accepted: bool,
}

/// A stored event after replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    /// Event identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Invitor's full name.
    pub invitor: String,
    /// When the event takes place.
    pub date_time: DateTime<Utc>,
    /// Participator limit, if any.
    pub max_participators: Option<u32>,
    /// Participator full names, best-ranked first.
    pub participators: Vec<String>,
}

/// A declared person after replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonReport {
    /// Person key.
    pub key: String,
    /// Full name.
    pub name: String,
    /// Number of events the person is registered for.
    pub event_count: u32,
    /// Titles of those events, in creation order.
    pub events: Vec<String>,
}

/// Replay `scenario` against a new controller whose clock is frozen at `now`.
///
/// # Errors
///
/// Returns [`CliError::DuplicatePerson`] if a person key is declared twice,
/// [`CliError::UnknownPerson`] for undeclared person keys, and
/// [`CliError::InvalidDate`] for unrepresentable day offsets.
pub fn replay(
    scenario: &Scenario,
    config: ControllerConfig,
    now: DateTime<Utc>,
) -> Result<Report, CliError> {
    let mut controller = Controller::with_config(config, FixedClock::new(now));

    let mut persons: BTreeMap<&str, Person> = BTreeMap::new();
    for decl in &scenario.persons {
        if persons
            .insert(decl.key.as_str(), person_from_decl(decl))
            .is_some()
        {
            return Err(CliError::DuplicatePerson(decl.key.clone()));
        }
    }
    let lookup = |key: &str| {
        persons
            .get(key)
            .ok_or_else(|| CliError::UnknownPerson(key.to_owned()))
    };

    let mut creations = Vec::with_capacity(scenario.events.len());
    for decl in &scenario.events {
        let invitor = lookup(decl.invitor.as_str())?;
        let date_time = TimeDelta::try_days(decl.starts_in_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| CliError::InvalidDate {
                title: decl.title.clone(),
                days: decl.starts_in_days,
            })?;
        let created = controller.create_event(
            Some(invitor),
            &decl.title,
            Some(date_time),
            decl.max_participators,
        )?;
        creations.push(CreationReport {
            title: decl.title.clone(),
            created,
        });
    }

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for step in &scenario.steps {
        let accepted = match step {
            Step::Register { person, event } => {
                controller.register_by_title(lookup(person.as_str())?, event)
            }
            Step::Unregister { person, event } => {
                controller.unregister_by_title(lookup(person.as_str())?, event)
            }
        };
        tracing::debug!(?step, accepted, "step replayed");
        steps.push(StepReport {
            step: step.clone(),
            accepted,
        });
    }

    let events = controller
        .events()
        .map(|event| EventReport {
            id: event.id(),
            title: event.title().to_owned(),
            invitor: event.invitor().full_name(),
            date_time: event.date_time(),
            max_participators: event.max_participators(),
            participators: controller
                .participators_by_title(event.title())
                .unwrap_or_default()
                .iter()
                .map(Person::full_name)
                .collect(),
        })
        .collect();

    let persons = scenario
        .persons
        .iter()
        .filter_map(|decl| persons.get(decl.key.as_str()).map(|p| (decl, p)))
        .map(|(decl, person)| PersonReport {
            key: decl.key.clone(),
            name: person.full_name(),
            event_count: person.event_count(),
            events: controller
                .get_events_for_person(Some(person))
                .unwrap_or_default()
                .into_iter()
                .map(|event| event.title().to_owned())
                .collect(),
        })
        .collect();

    Ok(Report {
        creations,
        steps,
        events,
        persons,
    })
}

fn person_from_decl(decl: &PersonDecl) -> Person {
    let person = Person::new(decl.last_name.as_str(), decl.first_name.as_str());
    if let Some(mail) = &decl.mail_address {
        person.set_mail_address(mail.as_str());
    }
    if let Some(phone) = &decl.phone_number {
        person.set_phone_number(phone.as_str());
    }
    person
}
