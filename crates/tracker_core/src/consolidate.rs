//! Merging of same-type task definitions drawn from the daily set, selected
//! events and selected event days.
//!
//! Inputs are processed in order. The first definition of a type creates the
//! entry; a later definition with a strictly greater count replaces every
//! template field of the entry. Sources are always accumulated, so a
//! consolidated task remembers each definition that contributed to it. On
//! equal counts the first-seen definition stays canonical.

use crate::catalog::Catalog;
use crate::catalog::registry::{DAILY_EVENT_ID, DAILY_EVENT_NAME};
use crate::model::{AnnotatedTask, ConsolidatedTask, TaskState, TaskTemplate};
use std::collections::HashMap;

pub fn consolidate(sources: &[AnnotatedTask]) -> Vec<ConsolidatedTask> {
    let mut index_by_type: HashMap<&str, usize> = HashMap::new();
    let mut consolidated: Vec<ConsolidatedTask> = Vec::new();

    for source in sources {
        let task_type = source.template.task_type.as_str();
        let record = source.source();

        match index_by_type.get(task_type) {
            Some(&index) => {
                let existing = &mut consolidated[index];
                if existing.template.is_toggle() != source.template.is_toggle() {
                    log::debug!(
                        "task type '{task_type}' mixes toggle and counted definitions; the counted one wins"
                    );
                }

                if source.template.required_count() > existing.required_count() {
                    existing.template = source.template.clone();
                }
                existing.source_events.push(record);
            }
            None => {
                index_by_type.insert(task_type, consolidated.len());
                consolidated.push(ConsolidatedTask {
                    template: source.template.clone(),
                    source_events: vec![record],
                });
            }
        }
    }

    consolidated
}

/// Annotates every task that is active for the current selection: the daily
/// set, then each selected event in selection order. Multi-day events only
/// contribute the tasks of their selected day.
pub fn collect_sources(catalog: &Catalog, state: &TaskState) -> Vec<AnnotatedTask> {
    let mut sources: Vec<AnnotatedTask> = catalog
        .daily_tasks
        .iter()
        .map(|task| annotate(task, DAILY_EVENT_ID, DAILY_EVENT_NAME, true))
        .collect();

    for event_id in &state.selected_events {
        let Some(event) = catalog.event(event_id) else {
            log::debug!("selected event '{event_id}' is not in the catalog");
            continue;
        };

        if event.is_multi_day() {
            let Some(sub_event_id) = state.selected_sub_event(event_id) else {
                continue;
            };
            match event.sub_event(sub_event_id) {
                Some(sub_event) => {
                    let event_name = format!("{} - {}", event.name, sub_event.name);
                    sources.extend(
                        sub_event
                            .tasks
                            .iter()
                            .map(|task| annotate(task, &sub_event.id, &event_name, false)),
                    );
                }
                None => log::debug!(
                    "selected day '{sub_event_id}' is not part of event '{event_id}'"
                ),
            }
        } else {
            sources.extend(
                event
                    .direct_tasks()
                    .iter()
                    .map(|task| annotate(task, &event.id, &event.name, false)),
            );
        }
    }

    sources
}

fn annotate(task: &TaskTemplate, event_id: &str, event_name: &str, is_daily: bool) -> AnnotatedTask {
    AnnotatedTask {
        template: task.clone(),
        event_id: event_id.to_string(),
        event_name: event_name.to_string(),
        is_daily,
    }
}
