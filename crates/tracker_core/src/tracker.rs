//! The engine facade consumed by the presentation layer: reads of the
//! consolidated task list and progress, and the user intents that mutate the
//! persisted [`TaskState`].

use crate::catalog::registry::builtin_catalog;
use crate::catalog::{Catalog, load_catalog};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::consolidate::{collect_sources, consolidate};
use crate::error::AppError;
use crate::identity::implied_closure;
use crate::model::{ConsolidatedTask, Notice, TaskState};
use crate::progress::{Milestone, Progress, milestones, summarize};
use crate::reset::{ResetOutcome, ResetScheduler, apply_reset};
use crate::storage::json_store::JsonFileStorage;
use crate::storage::{StateStorage, persist_state, restore_state};
use std::collections::BTreeSet;

pub fn resolve_catalog(config: &Config) -> Result<Catalog, AppError> {
    match config.catalog_path.as_deref() {
        Some(path) => load_catalog(path),
        None => Ok(builtin_catalog()),
    }
}

pub struct Tracker<S: StateStorage, C: Clock = SystemClock> {
    catalog: Catalog,
    storage: S,
    clock: C,
    state: TaskState,
}

impl Tracker<JsonFileStorage, SystemClock> {
    /// Opens the tracker on the store at `store_path()`.
    pub fn open(catalog: Catalog) -> Result<Self, AppError> {
        Ok(Self::with_storage(
            catalog,
            JsonFileStorage::from_env()?,
            SystemClock,
        ))
    }
}

impl<S: StateStorage, C: Clock> Tracker<S, C> {
    pub fn with_storage(catalog: Catalog, storage: S, clock: C) -> Self {
        let state = restore_state(&storage, clock.now_millis());
        Self {
            catalog,
            storage,
            clock,
            state,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current_tasks(&self) -> Vec<ConsolidatedTask> {
        consolidate(&collect_sources(&self.catalog, &self.state))
    }

    pub fn find_task(&self, task_id: &str) -> Result<ConsolidatedTask, AppError> {
        let trimmed_id = required_id(task_id)?;
        self.current_tasks()
            .into_iter()
            .find(|task| task.task_type() == trimmed_id)
            .ok_or_else(|| AppError::not_found(format!("task '{trimmed_id}' is not active")))
    }

    pub fn is_task_completed(&self, task_id: &str, event_id: Option<&str>) -> bool {
        self.state.is_completed(task_id, event_id)
    }

    pub fn task_count(&self, task_id: &str) -> u64 {
        self.state.count(task_id)
    }

    /// Types that count as done: those toggled complete plus everything they
    /// imply.
    pub fn satisfied_types(&self) -> BTreeSet<String> {
        let seeds = self
            .state
            .completed_tasks
            .iter()
            .filter(|record| record.event_id.is_none())
            .map(|record| record.task_id.as_str());
        implied_closure(seeds, self.catalog.all_tasks())
    }

    pub fn is_satisfied(&self, task: &ConsolidatedTask) -> bool {
        self.satisfied_types().contains(task.task_type())
    }

    pub fn progress(&self) -> Progress {
        let satisfied = self.satisfied_types();
        summarize(&self.current_tasks(), |task| {
            satisfied.contains(task.task_type())
        })
    }

    pub fn milestones(&self, task_id: &str) -> Result<Vec<Milestone>, AppError> {
        let task = self.find_task(task_id)?;
        Ok(milestones(&task, self.task_count(task.task_type())))
    }

    /// Notices of every selected event, followed by those of its selected
    /// day.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        for event_id in &self.state.selected_events {
            let Some(event) = self.catalog.event(event_id) else {
                continue;
            };
            notices.extend(event.notices.iter().cloned());

            if let Some(sub_event) = self
                .state
                .selected_sub_event(event_id)
                .and_then(|sub_event_id| event.sub_event(sub_event_id))
            {
                notices.extend(sub_event.notices.iter().cloned());
            }
        }
        notices
    }

    pub fn toggle_task(&mut self, task_id: &str, event_id: Option<&str>) -> Result<bool, AppError> {
        let task = self.find_task(task_id)?;
        let event_id = event_id.map(required_id).transpose()?;
        let now = self.clock.now_millis();
        let completed = self.state.toggle(task.task_type(), event_id, now);
        self.persist()?;
        Ok(completed)
    }

    pub fn toggle_event(&mut self, event_id: &str) -> Result<bool, AppError> {
        let trimmed_id = required_id(event_id)?;
        // A selection saved under another catalog can still be dropped.
        if self.catalog.event(trimmed_id).is_none() && !self.state.is_event_selected(trimmed_id) {
            return Err(AppError::not_found(format!("event '{trimmed_id}' not found")));
        }

        let selected = self.state.toggle_event(trimmed_id);
        self.persist()?;
        Ok(selected)
    }

    pub fn select_sub_event(&mut self, event_id: &str, sub_event_id: &str) -> Result<(), AppError> {
        let trimmed_event = required_id(event_id)?;
        let trimmed_sub_event = required_id(sub_event_id)?;
        let event = self
            .catalog
            .event(trimmed_event)
            .ok_or_else(|| AppError::not_found(format!("event '{trimmed_event}' not found")))?;
        if event.sub_event(trimmed_sub_event).is_none() {
            return Err(AppError::not_found(format!(
                "event '{trimmed_event}' has no day '{trimmed_sub_event}'"
            )));
        }

        self.state.select_sub_event(trimmed_event, trimmed_sub_event);
        self.persist()
    }

    /// Stores `count` clamped to `[0, required count]` and returns the stored
    /// value.
    pub fn update_task_count(&mut self, task_id: &str, count: i64) -> Result<u64, AppError> {
        let task = self.find_task(task_id)?;
        let stored = self
            .state
            .set_count(task.task_type(), count, task.required_count());
        self.persist()?;
        Ok(stored)
    }

    pub fn check_for_reset(&mut self) -> Result<Option<ResetOutcome>, AppError> {
        let now = self.clock.now_millis();
        match apply_reset(&mut self.state, now) {
            Some(outcome) => {
                log::info!(
                    "daily reset: cleared {} completions and {} counters",
                    outcome.cleared_completions,
                    outcome.cleared_counts
                );
                self.persist()?;
                Ok(Some(outcome))
            }
            None => Ok(None),
        }
    }

    /// Runs [`Self::check_for_reset`] when the scheduler's interval has
    /// elapsed.
    pub fn poll_reset(
        &mut self,
        scheduler: &mut ResetScheduler,
    ) -> Result<Option<ResetOutcome>, AppError> {
        let now = self.clock.now_millis();
        if !scheduler.is_due(now) {
            return Ok(None);
        }
        scheduler.mark_checked(now);
        self.check_for_reset()
    }

    fn persist(&mut self) -> Result<(), AppError> {
        persist_state(&mut self.storage, &self.state).inspect_err(|err| {
            log::warn!("failed to persist task state: {err}");
        })
    }
}

fn required_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}
