//! User-level operations over an injected [`Store`].
//!
//! Every write validates its input first; nothing reaches the store when
//! validation fails. Store failures are logged and returned unchanged, with
//! no retry.

pub mod calendar;
pub mod report;
pub mod upcoming;

pub use calendar::{CalendarEntry, CalendarMonth};
pub use report::ProjectReport;
pub use upcoming::UpcomingTask;

use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::model::{
    Journal, JournalDraft, JournalId, JournalPatch, Project, ProjectDraft, ProjectId,
    ProjectPatch, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, ValidationError,
};
use crate::recurrence::Expander;
use crate::storage::{Store, StoreError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

fn checked<T>(action: &'static str, result: Result<T, ValidationError>) -> DashboardResult<T> {
    result.map_err(|e| {
        warn!(action, error = %e, "rejected input");
        e.into()
    })
}

fn stored<T>(action: &'static str, result: Result<T, StoreError>) -> DashboardResult<T> {
    result.map_err(|e| {
        error!(action, error = %e, "store operation failed");
        e.into()
    })
}

pub struct Dashboard<S> {
    store: S,
    expander: Expander,
}

impl<S: Store> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            expander: Expander::default(),
        }
    }

    pub fn with_occurrence_cap(mut self, cap: usize) -> Self {
        self.expander = Expander::with_cap(cap);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand the store back, e.g. to close it.
    pub fn into_store(self) -> S {
        self.store
    }

    // Projects

    pub fn projects(&self) -> DashboardResult<Vec<Project>> {
        stored("list projects", self.store.list_projects())
    }

    pub fn project(&self, id: ProjectId) -> DashboardResult<Project> {
        self.projects()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: "project",
                    id: id.0,
                }
                .into()
            })
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> DashboardResult<ProjectId> {
        let draft = checked("add project", draft.validated())?;
        let id = stored("add project", self.store.create_project(&draft))?;
        info!(%id, name = %draft.name, "project added");
        Ok(id)
    }

    pub fn edit_project(&mut self, id: ProjectId, patch: ProjectPatch) -> DashboardResult<()> {
        let patch = checked("edit project", patch.validated())?;
        stored("edit project", self.store.update_project(id, &patch))?;
        info!(%id, "project updated");
        Ok(())
    }

    /// Deletes the project and its tasks in one store call, so a failure
    /// leaves both in place. Journals stay behind: they are not part of the
    /// cascade.
    pub fn remove_project(&mut self, id: ProjectId) -> DashboardResult<()> {
        let removed = stored("remove project", self.store.delete_project_with_tasks(id))?;
        info!(%id, tasks_removed = removed, "project removed");
        Ok(())
    }

    // Tasks

    pub fn tasks(&self, project_id: ProjectId) -> DashboardResult<Vec<Task>> {
        stored("list tasks", self.store.list_tasks_by_project(project_id))
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> DashboardResult<TaskId> {
        let draft = checked("add task", draft.validated())?;
        let id = stored("add task", self.store.create_task(&draft))?;
        info!(%id, project_id = %draft.project_id, "task added");
        Ok(id)
    }

    pub fn edit_task(&mut self, id: TaskId, patch: TaskPatch) -> DashboardResult<()> {
        let patch = checked("edit task", patch.validated())?;
        stored("edit task", self.store.update_task(id, &patch))?;
        info!(%id, "task updated");
        Ok(())
    }

    /// Flip the task between completed and pending, writing only `status`.
    pub fn toggle_task_status(&mut self, task: &Task) -> DashboardResult<TaskStatus> {
        let status = task.status.toggled();
        stored(
            "toggle task",
            self.store.update_task(task.id, &TaskPatch::status(status)),
        )?;
        info!(id = %task.id, %status, "task status toggled");
        Ok(status)
    }

    pub fn remove_task(&mut self, id: TaskId) -> DashboardResult<()> {
        stored("remove task", self.store.delete_task(id))?;
        info!(%id, "task removed");
        Ok(())
    }

    // Journals

    pub fn journals(&self, project_id: ProjectId) -> DashboardResult<Vec<Journal>> {
        stored(
            "list journals",
            self.store.list_journals_by_project(project_id),
        )
    }

    pub fn add_journal(&mut self, draft: JournalDraft) -> DashboardResult<JournalId> {
        let draft = checked("add journal", draft.validated())?;
        let id = stored("add journal", self.store.create_journal(&draft))?;
        info!(%id, project_id = %draft.project_id, "journal added");
        Ok(id)
    }

    pub fn edit_journal(&mut self, id: JournalId, patch: JournalPatch) -> DashboardResult<()> {
        let patch = checked("edit journal", patch.validated())?;
        stored("edit journal", self.store.update_journal(id, &patch))?;
        info!(%id, "journal updated");
        Ok(())
    }

    pub fn remove_journal(&mut self, id: JournalId) -> DashboardResult<()> {
        stored("remove journal", self.store.delete_journal(id))?;
        info!(%id, "journal removed");
        Ok(())
    }

    // Derived views

    pub fn report(&self, project_id: ProjectId) -> DashboardResult<ProjectReport> {
        let tasks = self.tasks(project_id)?;
        let journals = self.journals(project_id)?;
        Ok(ProjectReport::from_records(&tasks, &journals))
    }

    /// Open tasks across all projects, recurring ones expanded, ascending by
    /// due date.
    pub fn upcoming(&self) -> DashboardResult<Vec<UpcomingTask>> {
        let projects = self.projects()?;
        let mut tasks = Vec::new();
        let mut names = HashMap::with_capacity(projects.len());
        for project in projects {
            tasks.extend(self.tasks(project.id)?);
            names.insert(project.id, project.name);
        }
        Ok(upcoming::build_upcoming(&self.expander, &tasks, &names))
    }

    /// Stored due dates of the project's tasks for the month containing
    /// `anchor`. Recurring tasks appear on their template date only.
    pub fn calendar(
        &self,
        project_id: ProjectId,
        anchor: NaiveDate,
    ) -> DashboardResult<CalendarMonth> {
        let tasks = self.tasks(project_id)?;
        Ok(CalendarMonth::build(anchor, &tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frequency, RecurrenceRule};
    use crate::storage::SqliteStore;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard() -> Dashboard<SqliteStore> {
        Dashboard::new(SqliteStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_validation_blocks_store_write() {
        let mut board = dashboard();
        let err = board.add_project(ProjectDraft::new("   ")).unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
        assert!(board.projects().unwrap().is_empty());
    }

    #[test]
    fn test_remove_project_cascades_tasks_not_journals() {
        let mut board = dashboard();
        let project = board.add_project(ProjectDraft::new("Launch")).unwrap();
        board
            .add_task(TaskDraft::new(project, "Press kit", date(2024, 1, 1)))
            .unwrap();
        board
            .add_journal(JournalDraft::new(project, date(2024, 1, 1), "kickoff"))
            .unwrap();

        board.remove_project(project).unwrap();

        assert!(board.projects().unwrap().is_empty());
        assert!(board.tasks(project).unwrap().is_empty());
        assert_eq!(board.journals(project).unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_task_status() {
        let mut board = dashboard();
        let project = board.add_project(ProjectDraft::new("P")).unwrap();
        board
            .add_task(
                TaskDraft::new(project, "Review", date(2024, 1, 1))
                    .with_status(TaskStatus::InProgress),
            )
            .unwrap();

        let task = board.tasks(project).unwrap().remove(0);
        assert_eq!(board.toggle_task_status(&task).unwrap(), TaskStatus::Completed);

        let task = board.tasks(project).unwrap().remove(0);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(board.toggle_task_status(&task).unwrap(), TaskStatus::Pending);
    }

    #[test]
    fn test_edit_unknown_task_surfaces_store_error() {
        let mut board = dashboard();
        let err = board
            .edit_task(TaskId(5), TaskPatch::status(TaskStatus::Completed))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Store(StoreError::NotFound { kind: "task", id: 5 })));
    }

    #[test]
    fn test_empty_edit_is_rejected_before_the_store() {
        let mut board = dashboard();
        let err = board.edit_task(TaskId(5), TaskPatch::default()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::NothingToChange { record: "task" })
        ));
    }

    #[test]
    fn test_report() {
        let mut board = dashboard();
        let project = board.add_project(ProjectDraft::new("P")).unwrap();
        for (title, status) in [
            ("a", TaskStatus::Completed),
            ("b", TaskStatus::Pending),
            ("c", TaskStatus::InProgress),
        ] {
            board
                .add_task(TaskDraft::new(project, title, date(2024, 1, 1)).with_status(status))
                .unwrap();
        }
        board
            .add_journal(JournalDraft::new(project, date(2024, 1, 1), "note"))
            .unwrap();

        assert_eq!(
            board.report(project).unwrap(),
            ProjectReport {
                total_tasks: 3,
                completed_tasks: 1,
                pending_tasks: 2,
                total_journals: 1,
            }
        );
    }

    #[test]
    fn test_upcoming_respects_configured_cap() {
        let mut board = dashboard().with_occurrence_cap(5);
        let project = board.add_project(ProjectDraft::new("P")).unwrap();
        board
            .add_task(
                TaskDraft::new(project, "Water plants", date(2024, 1, 1))
                    .with_recurrence(RecurrenceRule::new(Frequency::Daily)),
            )
            .unwrap();

        let upcoming = board.upcoming().unwrap();
        assert_eq!(upcoming.len(), 5);
        assert!(upcoming.iter().all(|u| u.project_name == "P"));
    }

    #[test]
    fn test_project_lookup() {
        let mut board = dashboard();
        let id = board.add_project(ProjectDraft::new("Only")).unwrap();
        assert_eq!(board.project(id).unwrap().name, "Only");
        assert!(matches!(
            board.project(ProjectId(999)),
            Err(DashboardError::Store(StoreError::NotFound { .. }))
        ));
    }
}
