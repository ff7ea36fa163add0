//! Substitution of `${count}`, `${maxCount}`, `${remaining}` and
//! `${progress}` in task text.

use crate::model::TaskTemplate;

pub fn render(template: &str, task: &TaskTemplate, current_count: Option<u64>) -> String {
    let max_count = task.required_count();
    let count = current_count.or(task.count).unwrap_or(0);
    let remaining = max_count.saturating_sub(count);
    let progress = if max_count == 0 {
        0
    } else {
        (count as f64 / max_count as f64 * 100.0).round() as u64
    };

    template
        .replace("${count}", &count.to_string())
        .replace("${maxCount}", &max_count.to_string())
        .replace("${remaining}", &remaining.to_string())
        .replace("${progress}", &progress.to_string())
}

/// Name rendered against the full required count.
pub fn display_name(task: &TaskTemplate) -> String {
    render(&task.name, task, task.count)
}

pub fn display_description(task: &TaskTemplate) -> String {
    render(&task.description, task, task.count)
}

#[cfg(test)]
mod tests {
    use super::{display_name, render};
    use crate::model::TaskTemplate;

    fn counted(count: u64) -> TaskTemplate {
        TaskTemplate::new("hunt-beasts", "Defeat ${count} Beasts").with_count(count)
    }

    #[test]
    fn renders_count_and_max() {
        assert_eq!(render("${count}/${maxCount}", &counted(10), Some(4)), "4/10");
    }

    #[test]
    fn remaining_never_goes_negative() {
        assert_eq!(render("${remaining} left", &counted(5), Some(5)), "0 left");
        assert_eq!(render("${remaining} left", &counted(5), Some(8)), "0 left");
        assert_eq!(render("${remaining} left", &counted(5), Some(2)), "3 left");
    }

    #[test]
    fn progress_rounds_and_handles_missing_count() {
        assert_eq!(render("${progress}%", &counted(3), Some(1)), "33%");
        assert_eq!(render("${progress}%", &counted(3), Some(2)), "67%");

        let toggle = TaskTemplate::new("daily-login", "Log in");
        assert_eq!(render("${progress}% ${maxCount} ${count}", &toggle, None), "0% 0 0");
    }

    #[test]
    fn replaces_every_occurrence_and_leaves_plain_text_alone() {
        assert_eq!(
            render("${count} of ${count} (${maxCount})", &counted(7), None),
            "7 of 7 (7)"
        );
        assert_eq!(render("no tokens here", &counted(7), Some(1)), "no tokens here");
    }

    #[test]
    fn display_name_uses_required_count() {
        assert_eq!(display_name(&counted(25)), "Defeat 25 Beasts");
    }
}
