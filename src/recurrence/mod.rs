//! Expansion of recurring task templates into dated occurrences.
//!
//! A task whose rule has a frequency other than `None` stands for a series
//! of due dates: the stored due date, then one step later, and so on until
//! the rule's end date. Rules without an end date are open-ended, so every
//! expansion call shares a budget ([`DEFAULT_OCCURRENCE_CAP`]) that bounds
//! how many occurrences those rules may add.
//!
//! Occurrences exist only for display; they are never stored.

mod occurrences;

pub use occurrences::Occurrences;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::model::{Task, TaskId};

/// Total occurrences an expansion may hold before open-ended rules stop
/// generating.
pub const DEFAULT_OCCURRENCE_CAP: usize = 100;

/// One dated instance of a task: an independent copy of the template with
/// `due_date` set to this occurrence's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub task: Task,
    /// Position within the template's series, starting at 0.
    pub sequence: usize,
}

impl Occurrence {
    fn at(template: &Task, due_date: NaiveDate, sequence: usize) -> Self {
        let mut task = template.clone();
        task.due_date = due_date;
        Self { task, sequence }
    }

    pub fn due_date(&self) -> NaiveDate {
        self.task.due_date
    }

    pub fn template_id(&self) -> TaskId {
        self.task.id
    }
}

/// Expands task templates with a configurable budget for open-ended rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    cap: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Self::with_cap(DEFAULT_OCCURRENCE_CAP)
    }
}

impl Expander {
    pub fn with_cap(cap: usize) -> Self {
        Self { cap }
    }

    /// Expand `tasks` in input order.
    ///
    /// Non-recurring tasks pass through as a single occurrence. Each
    /// recurring task always contributes its first occurrence; further
    /// occurrences follow the rule's end date when it has one, and stop once
    /// the output holds `cap` occurrences when it does not.
    pub fn expand(&self, tasks: &[Task]) -> Vec<Occurrence> {
        let mut expanded = Vec::new();

        for task in tasks {
            let Some(dates) = task.recurrence.as_ref().and_then(|rule| {
                Occurrences::new(task.due_date, rule)
            }) else {
                expanded.push(Occurrence::at(task, task.due_date, 0));
                continue;
            };

            let bounded = dates.is_bounded();
            for (sequence, date) in dates.enumerate() {
                if !bounded && sequence > 0 && expanded.len() >= self.cap {
                    warn!(
                        task_id = %task.id,
                        cap = self.cap,
                        "recurring task expansion limit reached"
                    );
                    break;
                }
                expanded.push(Occurrence::at(task, date, sequence));
            }
        }

        expanded
    }
}

/// Expand with the default budget.
pub fn expand(tasks: &[Task]) -> Vec<Occurrence> {
    Expander::default().expand(tasks)
}

/// Ascending by due date. The sort is stable, so occurrences sharing a
/// date keep the order `expand` produced them in.
pub fn sort_occurrences(occurrences: &mut [Occurrence]) {
    occurrences.sort_by_key(Occurrence::due_date);
}
