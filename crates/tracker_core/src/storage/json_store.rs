use crate::config::app_dir;
use crate::error::AppError;
use crate::storage::StateStorage;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "state.json";
const STORE_ENV_VAR: &str = "TRACKER_STORE_PATH";

pub fn store_path() -> Result<PathBuf, AppError> {
    match std::env::var(STORE_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(app_dir()?.join(STORE_FILE_NAME)),
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<String>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        Ok(Some(content))
    }

    fn save(&mut self, content: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
        }

        std::fs::write(&self.path, content).map_err(|err| AppError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStorage;
    use crate::model::TaskState;
    use crate::storage::{StateStorage, persist_state, restore_state};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tracker-{nanos}-{file_name}"))
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("state.json");
        let mut storage = JsonFileStorage::new(&path);
        let mut state = TaskState::new(1_766_188_800_000);
        state.toggle("hunt-beasts", Some("lk-day-2"), 1_766_188_900_000);
        state.set_count("hunt-beasts", 20, 25);

        persist_state(&mut storage, &state).unwrap();
        let loaded = restore_state(&storage, 0);
        fs::remove_file(&path).ok();

        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let storage = JsonFileStorage::new(temp_path("missing.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested");
        let path = dir.join("deeper").join("state.json");
        let mut storage = JsonFileStorage::new(&path);

        storage.save("{}").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(content, "{}");
    }

    #[test]
    fn accepts_hand_written_state_document() {
        let path = temp_path("hand-written.json");
        let content = "{\n  \"completedTasks\": [\n    { \"taskId\": \"daily-login\", \"completedAt\": 1766188900000 }\n  ],\n  \"selectedEvents\": [\"lost-kingdom\"],\n  \"selectedSubEvents\": { \"lost-kingdom\": \"lk-day-1\" },\n  \"taskCounts\": { \"hunt-beasts\": 4 },\n  \"lastReset\": 1766188800000\n}";
        fs::write(&path, content).unwrap();

        let loaded = restore_state(&JsonFileStorage::new(&path), 0);
        fs::remove_file(&path).ok();

        assert_eq!(loaded.last_reset, 1_766_188_800_000);
        assert!(loaded.is_completed("daily-login", None));
        assert_eq!(loaded.selected_sub_event("lost-kingdom"), Some("lk-day-1"));
        assert_eq!(loaded.count("hunt-beasts"), 4);
    }

    #[test]
    fn corrupt_file_recovers_with_current_time() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "not json at all").unwrap();

        let loaded = restore_state(&JsonFileStorage::new(&path), 5_000);
        fs::remove_file(&path).ok();

        assert_eq!(loaded, TaskState::new(5_000));
    }
}
