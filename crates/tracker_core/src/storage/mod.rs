//! Durable single-key storage for [`TaskState`].

pub mod json_store;

use crate::error::AppError;
use crate::model::TaskState;

pub trait StateStorage {
    /// The stored payload, or `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>, AppError>;

    fn save(&mut self, content: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    content: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content<C: Into<String>>(content: C) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, AppError> {
        Ok(self.content.clone())
    }

    fn save(&mut self, content: &str) -> Result<(), AppError> {
        self.content = Some(content.to_string());
        Ok(())
    }
}

pub fn decode_state(content: &str) -> Result<TaskState, AppError> {
    serde_json::from_str(content)
        .map_err(|err| AppError::invalid_data(format!("invalid stored state: {err}")))
}

pub fn encode_state(state: &TaskState) -> Result<String, AppError> {
    serde_json::to_string_pretty(state).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Loads the stored state. Missing, unreadable or corrupt payloads yield a
/// fresh state whose reset window starts at `now`.
pub fn restore_state(storage: &dyn StateStorage, now: i64) -> TaskState {
    let content = match storage.load() {
        Ok(Some(content)) => content,
        Ok(None) => return TaskState::new(now),
        Err(err) => {
            log::warn!("could not read stored state, starting fresh: {err}");
            return TaskState::new(now);
        }
    };

    match decode_state(&content) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("discarding stored state: {err}");
            TaskState::new(now)
        }
    }
}

pub fn persist_state(storage: &mut dyn StateStorage, state: &TaskState) -> Result<(), AppError> {
    let content = encode_state(state)?;
    storage.save(&content)
}

#[cfg(test)]
mod tests {
    use super::{MemoryStorage, persist_state, restore_state};
    use crate::model::TaskState;

    #[test]
    fn missing_state_starts_fresh_at_now() {
        let storage = MemoryStorage::new();
        let state = restore_state(&storage, 42_000);

        assert_eq!(state, TaskState::new(42_000));
    }

    #[test]
    fn corrupt_state_is_discarded_and_never_inherits_epoch() {
        let storage = MemoryStorage::with_content("{ \"completedTasks\": [ oops");
        let state = restore_state(&storage, 42_000);

        assert_eq!(state.last_reset, 42_000);
        assert!(state.completed_tasks.is_empty());
    }

    #[test]
    fn state_without_last_reset_is_treated_as_corrupt() {
        let storage = MemoryStorage::with_content("{ \"completedTasks\": [] }");
        let state = restore_state(&storage, 42_000);

        assert_eq!(state.last_reset, 42_000);
    }

    #[test]
    fn persisted_state_round_trips() {
        let mut storage = MemoryStorage::new();
        let mut state = TaskState::new(1_000);
        state.toggle("save-bison", Some("server-reset-prep"), 1_500);
        state.toggle_event("lost-kingdom");
        state.select_sub_event("lost-kingdom", "lk-day-3");
        state.set_count("gather-resources", 3_000_000, 50_000_000);

        persist_state(&mut storage, &state).unwrap();
        let restored = restore_state(&storage, 99_999);

        assert_eq!(restored, state);
    }
}
