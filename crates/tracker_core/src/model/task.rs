use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A catalog entry. `task_type` is the consolidation identity; several
/// templates may share it at different required counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    #[serde(default)]
    pub is_point_accumulation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implies: Vec<String>,
}

/// Field-by-field overrides applied on top of a base template.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskOverrides {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub count: Option<u64>,
    pub points: Option<u64>,
    pub is_point_accumulation: Option<bool>,
    pub implies: Option<Vec<String>>,
}

impl TaskOverrides {
    pub fn count(count: u64) -> Self {
        Self {
            count: Some(count),
            ..Self::default()
        }
    }
}

impl TaskTemplate {
    pub fn new<T: Into<String>, N: Into<String>>(task_type: T, name: N) -> Self {
        Self {
            task_type: task_type.into(),
            id: None,
            name: name.into(),
            description: String::new(),
            category: String::new(),
            priority: Priority::Medium,
            count: None,
            points: None,
            is_point_accumulation: false,
            implies: Vec::new(),
        }
    }

    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category<C: Into<String>>(mut self, category: C) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_points(mut self, points: u64) -> Self {
        self.points = Some(points);
        self
    }

    pub fn accumulating(mut self) -> Self {
        self.is_point_accumulation = true;
        self
    }

    pub fn implying<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implies = types.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy with every field present in `overrides` replaced.
    /// The task type is never overridden.
    pub fn with_overrides(&self, overrides: TaskOverrides) -> Self {
        let base = self.clone();
        Self {
            task_type: base.task_type,
            id: overrides.id.or(base.id),
            name: overrides.name.unwrap_or(base.name),
            description: overrides.description.unwrap_or(base.description),
            category: overrides.category.unwrap_or(base.category),
            priority: overrides.priority.unwrap_or(base.priority),
            count: overrides.count.or(base.count),
            points: overrides.points.or(base.points),
            is_point_accumulation: overrides
                .is_point_accumulation
                .unwrap_or(base.is_point_accumulation),
            implies: overrides.implies.unwrap_or(base.implies),
        }
    }

    pub fn required_count(&self) -> u64 {
        self.count.unwrap_or(0)
    }

    pub fn is_toggle(&self) -> bool {
        self.count.is_none()
    }
}

/// Provenance of one contributing definition of a consolidated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSource {
    pub event_id: String,
    pub event_name: String,
    pub original_count: u64,
    pub is_daily: bool,
}

/// A template tagged with the event (or daily set) it was drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTask {
    pub template: TaskTemplate,
    pub event_id: String,
    pub event_name: String,
    pub is_daily: bool,
}

impl AnnotatedTask {
    pub fn source(&self) -> TaskSource {
        TaskSource {
            event_id: self.event_id.clone(),
            event_name: self.event_name.clone(),
            original_count: self.template.required_count(),
            is_daily: self.is_daily,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedTask {
    #[serde(flatten)]
    pub template: TaskTemplate,
    pub source_events: Vec<TaskSource>,
}

impl ConsolidatedTask {
    pub fn task_type(&self) -> &str {
        &self.template.task_type
    }

    pub fn required_count(&self) -> u64 {
        self.template.required_count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, TaskOverrides, TaskTemplate};

    #[test]
    fn with_overrides_prefers_override_and_keeps_base_defaults() {
        let base = TaskTemplate::new("train-lv10-troops", "Train ${count} Lv. 10 Troop(s)")
            .with_category("military")
            .with_priority(Priority::High)
            .with_count(1)
            .with_points(24)
            .accumulating();

        let merged = base.with_overrides(TaskOverrides {
            count: Some(500),
            priority: Some(Priority::Low),
            ..TaskOverrides::default()
        });

        assert_eq!(merged.task_type, "train-lv10-troops");
        assert_eq!(merged.count, Some(500));
        assert_eq!(merged.priority, Priority::Low);
        assert_eq!(merged.points, Some(24));
        assert_eq!(merged.category, "military");
        assert!(merged.is_point_accumulation);
        assert_eq!(base.count, Some(1));
    }

    #[test]
    fn template_deserializes_with_defaults() {
        let template: TaskTemplate = serde_json::from_str(
            r#"{ "type": "save-bison", "name": "Save bison", "priority": "low" }"#,
        )
        .unwrap();

        assert_eq!(template.task_type, "save-bison");
        assert_eq!(template.priority, Priority::Low);
        assert!(template.is_toggle());
        assert_eq!(template.required_count(), 0);
        assert!(!template.is_point_accumulation);
        assert!(template.implies.is_empty());
    }

    #[test]
    fn template_serializes_type_and_camel_case_keys() {
        let template = TaskTemplate::new("use-gems", "Use gems")
            .with_count(3)
            .accumulating();
        let value = serde_json::to_value(&template).unwrap();

        assert_eq!(value["type"], "use-gems");
        assert_eq!(value["isPointAccumulation"], true);
        assert_eq!(value["count"], 3);
        assert!(value.get("id").is_none());
    }
}
