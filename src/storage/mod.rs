//! Persistence for projects, tasks and journals.
//!
//! [`Store`] is the contract the rest of the crate consumes; [`SqliteStore`]
//! is the on-disk implementation. Stores are constructed explicitly and
//! passed to whoever needs them, there is no process-wide handle.

pub mod database;
pub mod error;

pub use database::SqliteStore;
pub use error::StoreError;

use crate::model::{
    Journal, JournalDraft, JournalId, JournalPatch, Project, ProjectDraft, ProjectId,
    ProjectPatch, Task, TaskDraft, TaskId, TaskPatch,
};

/// Per-collection CRUD plus lookup by owning project.
///
/// Updates merge the supplied fields into the stored record and fail with
/// [`StoreError::NotFound`] for unknown ids. Deletes of unknown ids succeed
/// without effect.
pub trait Store {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    fn create_project(&mut self, draft: &ProjectDraft) -> Result<ProjectId, StoreError>;
    fn update_project(&mut self, id: ProjectId, patch: &ProjectPatch) -> Result<(), StoreError>;
    fn delete_project(&mut self, id: ProjectId) -> Result<(), StoreError>;

    /// Removes the project together with every task it owns, as one unit.
    /// Journals are left in place. Returns the number of tasks removed.
    fn delete_project_with_tasks(&mut self, id: ProjectId) -> Result<usize, StoreError>;

    fn list_tasks_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>, StoreError>;
    fn create_task(&mut self, draft: &TaskDraft) -> Result<TaskId, StoreError>;
    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError>;
    fn delete_task(&mut self, id: TaskId) -> Result<(), StoreError>;

    /// Removes every task owned by `project_id` as one unit: either all of
    /// them are gone afterwards or none are. Returns the number removed.
    fn delete_all_tasks_by_project(&mut self, project_id: ProjectId) -> Result<usize, StoreError>;

    fn list_journals_by_project(&self, project_id: ProjectId) -> Result<Vec<Journal>, StoreError>;
    fn create_journal(&mut self, draft: &JournalDraft) -> Result<JournalId, StoreError>;
    fn update_journal(&mut self, id: JournalId, patch: &JournalPatch) -> Result<(), StoreError>;
    fn delete_journal(&mut self, id: JournalId) -> Result<(), StoreError>;
}
