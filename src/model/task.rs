use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, TaskId};
use super::priority::Priority;
use super::recurrence::RecurrenceRule;
use super::status::TaskStatus;
use super::validation::{ValidationError, optional_text, require_text};

/// A stored task. When `recurrence` is set the task acts as a template:
/// its occurrences are generated for display and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: TaskStatus,
    pub recurrence: Option<RecurrenceRule>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.as_ref().is_some_and(RecurrenceRule::is_recurring)
    }

    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(recurrence) = &patch.recurrence {
            self.recurrence = recurrence.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl TaskDraft {
    pub fn new(project_id: ProjectId, title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            due_date,
            priority: Priority::default(),
            status: TaskStatus::default(),
            recurrence: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_recurrence(mut self, recurrence: RecurrenceRule) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        require_text("task title", &title)?;
        Ok(Self {
            title,
            description: optional_text(self.description),
            recurrence: normalize_recurrence(self.recurrence),
            ..self
        })
    }
}

/// Partial update. The owning project is deliberately absent: it is fixed
/// at creation. Nested options clear the field when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub recurrence: Option<Option<RecurrenceRule>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NothingToChange { record: "task" });
        }
        let title = match self.title {
            Some(title) => {
                let title = title.trim().to_string();
                require_text("task title", &title)?;
                Some(title)
            }
            None => None,
        };
        Ok(Self {
            title,
            description: self.description.map(optional_text),
            recurrence: self.recurrence.map(normalize_recurrence),
            ..self
        })
    }
}

/// A `None` frequency carries no schedule, so the rule is dropped entirely.
fn normalize_recurrence(rule: Option<RecurrenceRule>) -> Option<RecurrenceRule> {
    rule.filter(RecurrenceRule::is_recurring)
}
