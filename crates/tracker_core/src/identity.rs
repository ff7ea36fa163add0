use crate::model::TaskTemplate;
use std::collections::{BTreeSet, HashMap};

/// Key that keeps same-type tasks at different required counts apart.
pub fn identifier_of(task: &TaskTemplate) -> String {
    format!("{}:{}", task.task_type, task.required_count())
}

/// Every task type reachable from `seeds` through `implies` lists, seeds
/// included. A type is expanded at most once, so cycles terminate.
pub fn implied_closure<'s, 't, S, I>(seeds: S, tasks: I) -> BTreeSet<String>
where
    S: IntoIterator<Item = &'s str>,
    I: IntoIterator<Item = &'t TaskTemplate>,
{
    let mut implies_by_type: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in tasks {
        implies_by_type
            .entry(task.task_type.as_str())
            .or_default()
            .extend(task.implies.iter().map(String::as_str));
    }

    let mut visited = BTreeSet::new();
    let mut stack: Vec<&str> = Vec::new();
    for seed in seeds {
        stack.push(seed);
    }
    stack.reverse();

    while let Some(task_type) = stack.pop() {
        if !visited.insert(task_type.to_string()) {
            continue;
        }
        if let Some(implied) = implies_by_type.get(task_type) {
            for implied_type in implied.iter().rev() {
                stack.push(implied_type);
            }
        }
    }

    visited
}
