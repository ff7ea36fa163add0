//! The immutable task catalog: the always-active daily set plus the events a
//! player can opt into.
//!
//! Catalog files are parsed leniently. A malformed task, sub-event or event is
//! skipped with a warning and the rest of the document still loads.

pub mod registry;

use crate::error::AppError;
use crate::model::{Event, EventShape, Notice, SubEvent, TaskTemplate};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub daily_tasks: Vec<TaskTemplate>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    DuplicateEventId(String),
    DurationWithSubEvents(String),
    NoSubEvents(String),
    DuplicateSubEventId { event_id: String, sub_event_id: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEventId(id) => write!(f, "event '{id}' is defined more than once"),
            Self::DurationWithSubEvents(id) => write!(
                f,
                "event '{id}' declares both a duration and sub-events; sub-events are used"
            ),
            Self::NoSubEvents(id) => write!(f, "multi-day event '{id}' has no sub-events"),
            Self::DuplicateSubEventId {
                event_id,
                sub_event_id,
            } => write!(
                f,
                "event '{event_id}' defines sub-event '{sub_event_id}' more than once"
            ),
        }
    }
}

impl Catalog {
    pub fn new(daily_tasks: Vec<TaskTemplate>, events: Vec<Event>) -> Self {
        Self {
            daily_tasks,
            events,
        }
    }

    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == event_id)
    }

    /// Every template in the catalog, daily set first.
    pub fn all_tasks(&self) -> impl Iterator<Item = &TaskTemplate> {
        self.daily_tasks.iter().chain(self.events.iter().flat_map(|event| {
            event.direct_tasks().iter().chain(
                event
                    .sub_events()
                    .iter()
                    .flat_map(|sub_event| sub_event.tasks.iter()),
            )
        }))
    }

    pub fn validate(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();
        let mut seen_events = HashSet::new();

        for event in &self.events {
            if !seen_events.insert(event.id.as_str()) {
                warnings.push(CatalogWarning::DuplicateEventId(event.id.clone()));
            }

            if let EventShape::MultiDay {
                duration,
                sub_events,
            } = &event.shape
            {
                if duration.is_some() {
                    warnings.push(CatalogWarning::DurationWithSubEvents(event.id.clone()));
                }
                if sub_events.is_empty() {
                    warnings.push(CatalogWarning::NoSubEvents(event.id.clone()));
                }

                let mut seen_days = HashSet::new();
                for sub_event in sub_events {
                    if !seen_days.insert(sub_event.id.as_str()) {
                        warnings.push(CatalogWarning::DuplicateSubEventId {
                            event_id: event.id.clone(),
                            sub_event_id: sub_event.id.clone(),
                        });
                    }
                }
            }
        }

        warnings
    }

    pub fn from_json_str(content: &str) -> Result<Self, AppError> {
        let document: Value = serde_json::from_str(content)
            .map_err(|err| AppError::invalid_data(format!("invalid catalog JSON: {err}")))?;
        let object = document
            .as_object()
            .ok_or_else(|| AppError::invalid_data("catalog must be a JSON object"))?;

        let daily_tasks = match object.get("dailyTasks") {
            Some(Value::Array(values)) => parse_tasks(values, "daily tasks"),
            Some(_) => {
                log::warn!("catalog 'dailyTasks' is not a list; ignoring it");
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut events = Vec::new();
        match object.get("events") {
            Some(Value::Array(values)) => {
                for (index, value) in values.iter().enumerate() {
                    match serde_json::from_value::<RawEvent>(value.clone()) {
                        Ok(raw) => {
                            if let Some(event) = raw.into_event() {
                                events.push(event);
                            }
                        }
                        Err(err) => log::warn!("skipping catalog event #{index}: {err}"),
                    }
                }
            }
            Some(_) => log::warn!("catalog 'events' is not a list; ignoring it"),
            None => {}
        }

        let catalog = Self::new(daily_tasks, events);
        for warning in catalog.validate() {
            log::warn!("{warning}");
        }
        Ok(catalog)
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    Catalog::from_json_str(&content)
}

fn parse_tasks(values: &[Value], context: &str) -> Vec<TaskTemplate> {
    values
        .iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<TaskTemplate>(value.clone()) {
                Ok(task) => Some(task),
                Err(err) => {
                    log::warn!("skipping task #{index} in {context}: {err}");
                    None
                }
            },
        )
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubEvent {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    day: u32,
    #[serde(default)]
    notices: Vec<Notice>,
    #[serde(default)]
    tasks: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    kind: String,
    #[serde(default)]
    notices: Vec<Notice>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    tasks: Vec<Value>,
    #[serde(default)]
    sub_events: Vec<Value>,
}

impl RawEvent {
    fn into_event(self) -> Option<Event> {
        let context = format!("event '{}'", self.id);
        let shape = match self.kind.as_str() {
            "flat" => EventShape::Flat {
                tasks: parse_tasks(&self.tasks, &context),
            },
            "durational" => match self.duration {
                Some(duration) => EventShape::Durational {
                    duration,
                    tasks: parse_tasks(&self.tasks, &context),
                },
                None => {
                    log::warn!("skipping {context}: durational event without a duration");
                    return None;
                }
            },
            "multiDay" => {
                if !self.tasks.is_empty() {
                    log::warn!("{context}: top-level tasks on a multi-day event are ignored");
                }
                EventShape::MultiDay {
                    duration: self.duration,
                    sub_events: self
                        .sub_events
                        .iter()
                        .enumerate()
                        .filter_map(|(index, value)| parse_sub_event(value, index, &context))
                        .collect(),
                }
            }
            other => {
                log::warn!("skipping {context}: unknown event kind '{other}'");
                return None;
            }
        };

        Some(Event {
            id: self.id,
            name: self.name,
            description: self.description,
            notices: self.notices,
            shape,
        })
    }
}

fn parse_sub_event(value: &Value, index: usize, context: &str) -> Option<SubEvent> {
    match serde_json::from_value::<RawSubEvent>(value.clone()) {
        Ok(raw) => {
            let sub_context = format!("{context} sub-event '{}'", raw.id);
            Some(SubEvent {
                tasks: parse_tasks(&raw.tasks, &sub_context),
                id: raw.id,
                name: raw.name,
                description: raw.description,
                day: raw.day,
                notices: raw.notices,
            })
        }
        Err(err) => {
            log::warn!("skipping sub-event #{index} of {context}: {err}");
            None
        }
    }
}
