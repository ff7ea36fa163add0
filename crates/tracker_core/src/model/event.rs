use crate::model::{Priority, TaskTemplate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notice_type: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub day: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    pub tasks: Vec<TaskTemplate>,
}

/// The three mutually exclusive event shapes. Catalog sources declare the
/// shape with an explicit `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventShape {
    Flat {
        tasks: Vec<TaskTemplate>,
    },
    Durational {
        duration: u32,
        tasks: Vec<TaskTemplate>,
    },
    /// `duration` is display-only; a multi-day event that also declares one
    /// is flagged by catalog validation.
    #[serde(rename_all = "camelCase")]
    MultiDay {
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
        sub_events: Vec<SubEvent>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    #[serde(flatten)]
    pub shape: EventShape,
}

impl Event {
    pub fn is_multi_day(&self) -> bool {
        matches!(self.shape, EventShape::MultiDay { .. })
    }

    pub fn duration(&self) -> Option<u32> {
        match &self.shape {
            EventShape::Flat { .. } => None,
            EventShape::Durational { duration, .. } => Some(*duration),
            EventShape::MultiDay { duration, .. } => *duration,
        }
    }

    pub fn sub_events(&self) -> &[SubEvent] {
        match &self.shape {
            EventShape::MultiDay { sub_events, .. } => sub_events,
            _ => &[],
        }
    }

    pub fn sub_event(&self, sub_event_id: &str) -> Option<&SubEvent> {
        self.sub_events()
            .iter()
            .find(|sub_event| sub_event.id == sub_event_id)
    }

    /// Tasks of a flat or durational event. Multi-day events carry their
    /// tasks on the sub-events instead.
    pub fn direct_tasks(&self) -> &[TaskTemplate] {
        match &self.shape {
            EventShape::Flat { tasks } | EventShape::Durational { tasks, .. } => tasks,
            EventShape::MultiDay { .. } => &[],
        }
    }
}
