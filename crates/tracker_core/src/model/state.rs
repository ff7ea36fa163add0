use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub task_id: String,
    pub completed_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl CompletionRecord {
    fn matches(&self, task_id: &str, event_id: Option<&str>) -> bool {
        self.task_id == task_id && self.event_id.as_deref() == event_id
    }
}

/// The persisted root. Serialized field names are part of the storage
/// format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    #[serde(default)]
    pub completed_tasks: Vec<CompletionRecord>,
    #[serde(default)]
    pub selected_events: Vec<String>,
    #[serde(default)]
    pub selected_sub_events: BTreeMap<String, String>,
    #[serde(default)]
    pub task_counts: BTreeMap<String, u64>,
    pub last_reset: i64,
}

impl TaskState {
    pub fn new(now: i64) -> Self {
        Self {
            completed_tasks: Vec::new(),
            selected_events: Vec::new(),
            selected_sub_events: BTreeMap::new(),
            task_counts: BTreeMap::new(),
            last_reset: now,
        }
    }

    pub fn is_completed(&self, task_id: &str, event_id: Option<&str>) -> bool {
        self.completed_tasks
            .iter()
            .any(|record| record.matches(task_id, event_id))
    }

    /// Flips completion of `(task_id, event_id)` and returns the new state.
    pub fn toggle(&mut self, task_id: &str, event_id: Option<&str>, now: i64) -> bool {
        if self.is_completed(task_id, event_id) {
            self.completed_tasks
                .retain(|record| !record.matches(task_id, event_id));
            false
        } else {
            self.completed_tasks.push(CompletionRecord {
                task_id: task_id.to_string(),
                completed_at: now,
                event_id: event_id.map(str::to_string),
            });
            true
        }
    }

    pub fn count(&self, task_id: &str) -> u64 {
        self.task_counts.get(task_id).copied().unwrap_or(0)
    }

    /// Stores `requested` clamped to `[0, max]` and returns the stored value.
    pub fn set_count(&mut self, task_id: &str, requested: i64, max: u64) -> u64 {
        let clamped = u64::try_from(requested).unwrap_or(0).min(max);
        self.task_counts.insert(task_id.to_string(), clamped);
        clamped
    }

    pub fn is_event_selected(&self, event_id: &str) -> bool {
        self.selected_events.iter().any(|id| id == event_id)
    }

    /// Adds or removes `event_id` from the selection and returns whether it is
    /// now selected. Sub-event choices survive deselection.
    pub fn toggle_event(&mut self, event_id: &str) -> bool {
        if self.is_event_selected(event_id) {
            self.selected_events.retain(|id| id != event_id);
            false
        } else {
            self.selected_events.push(event_id.to_string());
            true
        }
    }

    pub fn select_sub_event(&mut self, event_id: &str, sub_event_id: &str) {
        self.selected_sub_events
            .insert(event_id.to_string(), sub_event_id.to_string());
    }

    pub fn selected_sub_event(&self, event_id: &str) -> Option<&str> {
        self.selected_sub_events.get(event_id).map(String::as_str)
    }
}
