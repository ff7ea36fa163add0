use crate::model::ConsolidatedTask;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
}

pub fn summarize<F>(tasks: &[ConsolidatedTask], mut is_completed: F) -> Progress
where
    F: FnMut(&ConsolidatedTask) -> bool,
{
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| is_completed(task)).count();
    let percentage = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    Progress {
        completed,
        total,
        percentage,
    }
}

/// Partial credit toward one contributing definition of a consolidated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub event_id: String,
    pub event_name: String,
    pub required: u64,
    pub achieved: u64,
    pub reached: bool,
}

pub fn milestones(task: &ConsolidatedTask, current: u64) -> Vec<Milestone> {
    task.source_events
        .iter()
        .map(|source| Milestone {
            event_id: source.event_id.clone(),
            event_name: source.event_name.clone(),
            required: source.original_count,
            achieved: current.min(source.original_count),
            reached: current >= source.original_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{milestones, summarize};
    use crate::model::{ConsolidatedTask, TaskSource, TaskTemplate};

    fn task(task_type: &str, sources: &[(&str, u64)]) -> ConsolidatedTask {
        let max = sources.iter().map(|(_, count)| *count).max().unwrap_or(0);
        ConsolidatedTask {
            template: TaskTemplate::new(task_type, task_type).with_count(max),
            source_events: sources
                .iter()
                .map(|(event_id, count)| TaskSource {
                    event_id: event_id.to_string(),
                    event_name: event_id.to_string(),
                    original_count: *count,
                    is_daily: false,
                })
                .collect(),
        }
    }

    #[test]
    fn one_of_four_completed_is_twenty_five_percent() {
        let tasks = vec![
            task("a", &[("daily", 1)]),
            task("b", &[("daily", 1)]),
            task("c", &[("daily", 1)]),
            task("d", &[("daily", 1)]),
        ];

        let progress = summarize(&tasks, |task| task.task_type() == "b");

        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.percentage, 25.0);
    }

    #[test]
    fn empty_list_reports_zero_percent() {
        let progress = summarize(&[], |_| true);

        assert_eq!(progress.completed, 0);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn percentage_stays_within_bounds() {
        let tasks = vec![task("a", &[("daily", 1)]), task("b", &[("daily", 1)])];

        let none = summarize(&tasks, |_| false);
        let all = summarize(&tasks, |_| true);

        assert_eq!(none.percentage, 0.0);
        assert_eq!(all.percentage, 100.0);
    }

    #[test]
    fn milestones_report_partial_credit_per_source() {
        let hunt = task("hunt-beasts", &[("lk-day-1", 15), ("lk-day-2", 25)]);

        let reached = milestones(&hunt, 18);

        assert_eq!(reached.len(), 2);
        assert_eq!(reached[0].achieved, 15);
        assert!(reached[0].reached);
        assert_eq!(reached[1].achieved, 18);
        assert_eq!(reached[1].required, 25);
        assert!(!reached[1].reached);
    }
}
