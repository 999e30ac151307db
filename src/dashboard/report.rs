use serde::Serialize;

use crate::model::{Journal, Task};

/// Counts over one project's tasks and journals, computed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Every task that is not completed, in progress included.
    pub pending_tasks: usize,
    pub total_journals: usize,
}

impl ProjectReport {
    pub fn from_records(tasks: &[Task], journals: &[Journal]) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.status.is_completed()).count();
        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            pending_tasks: tasks.len() - completed_tasks,
            total_journals: journals.len(),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> [(&'static str, usize); 4] {
        [
            ("Total Tasks", self.total_tasks),
            ("Completed Tasks", self.completed_tasks),
            ("Pending Tasks", self.pending_tasks),
            ("Total Journals", self.total_journals),
        ]
    }
}
