pub mod ids;
pub mod journal;
pub mod priority;
pub mod project;
pub mod recurrence;
pub mod status;
pub mod task;
pub mod validation;

pub use ids::{JournalId, ProjectId, TaskId};
pub use journal::{Journal, JournalDraft, JournalPatch};
pub use priority::Priority;
pub use project::{Project, ProjectDraft, ProjectPatch};
pub use recurrence::{Frequency, RecurrenceRule};
pub use status::TaskStatus;
pub use task::{Task, TaskDraft, TaskPatch};
pub use validation::ValidationError;
