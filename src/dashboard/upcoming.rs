use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::model::{ProjectId, Task};
use crate::recurrence::{Expander, Occurrence, sort_occurrences};
use crate::views::DueUrgency;

/// An occurrence of a not-yet-completed task, tagged with its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask {
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub project_name: String,
}

impl UpcomingTask {
    pub fn due_date(&self) -> NaiveDate {
        self.occurrence.due_date()
    }

    pub fn urgency(&self, today: NaiveDate) -> DueUrgency {
        DueUrgency::classify(self.due_date(), today)
    }
}

/// Drop completed tasks, expand the rest, then sort by due date.
pub(crate) fn build_upcoming(
    expander: &Expander,
    tasks: &[Task],
    project_names: &HashMap<ProjectId, String>,
) -> Vec<UpcomingTask> {
    let open: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.status.is_completed())
        .cloned()
        .collect();

    let mut occurrences = expander.expand(&open);
    sort_occurrences(&mut occurrences);

    occurrences
        .into_iter()
        .map(|occurrence| {
            let project_name = project_names
                .get(&occurrence.task.project_id)
                .cloned()
                .unwrap_or_default();
            UpcomingTask {
                occurrence,
                project_name,
            }
        })
        .collect()
}
