//! Daily reset of completion and progress.
//!
//! The window is a rolling 24 hours anchored at the last reset instant, not a
//! calendar UTC midnight.

use crate::model::TaskState;
use serde::Serialize;
use std::time::Duration;

pub const RESET_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub previous_reset: i64,
    pub reset_at: i64,
    pub cleared_completions: usize,
    pub cleared_counts: usize,
}

pub fn needs_reset(state: &TaskState, now: i64) -> bool {
    now.saturating_sub(state.last_reset) >= RESET_WINDOW_MS
}

/// Clears completions and counters when the window has elapsed. Selections
/// are kept. Does nothing otherwise.
pub fn apply_reset(state: &mut TaskState, now: i64) -> Option<ResetOutcome> {
    if !needs_reset(state, now) {
        return None;
    }

    let outcome = ResetOutcome {
        previous_reset: state.last_reset,
        reset_at: now,
        cleared_completions: state.completed_tasks.len(),
        cleared_counts: state.task_counts.len(),
    };
    state.completed_tasks.clear();
    state.task_counts.clear();
    state.last_reset = now;
    Some(outcome)
}

/// Rate limiter for the periodic check.
#[derive(Debug, Clone)]
pub struct ResetScheduler {
    interval_ms: i64,
    last_check: Option<i64>,
}

impl ResetScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: i64::try_from(interval.as_millis()).unwrap_or(i64::MAX),
            last_check: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(0) as u64)
    }

    pub fn is_due(&self, now: i64) -> bool {
        match self.last_check {
            Some(last) => now.saturating_sub(last) >= self.interval_ms,
            None => true,
        }
    }

    pub fn mark_checked(&mut self, now: i64) {
        self.last_check = Some(now);
    }
}

impl Default for ResetScheduler {
    fn default() -> Self {
        Self::new(CHECK_INTERVAL)
    }
}
