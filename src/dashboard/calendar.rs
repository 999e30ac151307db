use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub task_id: TaskId,
    pub title: String,
}

/// One month of a project's tasks, keyed by stored due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, Vec<CalendarEntry>>,
}

impl CalendarMonth {
    /// Place every task due in the month of `anchor` on its day. Tasks keep
    /// their input order within a day.
    pub fn build(anchor: NaiveDate, tasks: &[Task]) -> Self {
        let (year, month) = (anchor.year(), anchor.month());
        let mut days: BTreeMap<NaiveDate, Vec<CalendarEntry>> = BTreeMap::new();

        for task in tasks
            .iter()
            .filter(|t| t.due_date.year() == year && t.due_date.month() == month)
        {
            days.entry(task.due_date).or_default().push(CalendarEntry {
                task_id: task.id,
                title: task.title.clone(),
            });
        }

        Self { year, month, days }
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[CalendarEntry] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
