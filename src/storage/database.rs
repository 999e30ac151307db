use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Store, StoreError};
use crate::model::{
    Frequency, Journal, JournalDraft, JournalId, JournalPatch, Priority, Project, ProjectDraft,
    ProjectId, ProjectPatch, RecurrenceRule, Task, TaskDraft, TaskId, TaskPatch, TaskStatus,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT
);
CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    due_date TEXT NOT NULL,
    priority TEXT NOT NULL,
    status TEXT NOT NULL,
    recurrence_frequency TEXT,
    recurrence_interval INTEGER,
    recurrence_end_date TEXT
);
CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id);

CREATE TABLE IF NOT EXISTS journals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    content TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_journals_project_id ON journals(project_id);
";

const TASK_COLUMNS: &str = "id, project_id, title, description, due_date, priority, status,
     recurrence_frequency, recurrence_interval, recurrence_end_date";

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_from_db(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Raw data extracted from a task row before conversion to Task
struct TaskRowData {
    id: i64,
    project_id: i64,
    title: String,
    description: Option<String>,
    due_date_str: String,
    priority_str: String,
    status_str: String,
    frequency_str: Option<String>,
    interval: Option<i64>,
    end_date_str: Option<String>,
}

impl TaskRowData {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            due_date_str: row.get(4)?,
            priority_str: row.get(5)?,
            status_str: row.get(6)?,
            frequency_str: row.get(7)?,
            interval: row.get(8)?,
            end_date_str: row.get(9)?,
        })
    }

    fn into_task(self) -> Result<Task, StoreError> {
        let id = self.id;
        let corrupt = |detail: String| StoreError::Corrupt {
            kind: "task",
            id,
            detail,
        };

        let due_date = date_from_db(&self.due_date_str)
            .ok_or_else(|| corrupt(format!("bad due date {:?}", self.due_date_str)))?;
        let priority = Priority::from_db_str(&self.priority_str)
            .ok_or_else(|| corrupt(format!("bad priority {:?}", self.priority_str)))?;
        let status = TaskStatus::from_db_str(&self.status_str)
            .ok_or_else(|| corrupt(format!("bad status {:?}", self.status_str)))?;

        let recurrence = match self.frequency_str {
            Some(freq) => {
                let frequency = Frequency::from_db_str(&freq)
                    .ok_or_else(|| corrupt(format!("bad frequency {freq:?}")))?;
                let end_date = match self.end_date_str {
                    Some(s) => Some(
                        date_from_db(&s).ok_or_else(|| corrupt(format!("bad end date {s:?}")))?,
                    ),
                    None => None,
                };
                Some(RecurrenceRule {
                    frequency,
                    interval: self.interval,
                    end_date,
                })
            }
            None => None,
        };

        Ok(Task {
            id: TaskId(self.id),
            project_id: ProjectId(self.project_id),
            title: self.title,
            description: self.description,
            due_date,
            priority,
            status,
            recurrence,
        })
    }
}

/// Raw data extracted from a journal row before conversion to Journal
struct JournalRowData {
    id: i64,
    project_id: i64,
    date_str: String,
    content: String,
}

impl JournalRowData {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            date_str: row.get(2)?,
            content: row.get(3)?,
        })
    }

    fn into_journal(self) -> Result<Journal, StoreError> {
        let date = date_from_db(&self.date_str).ok_or_else(|| StoreError::Corrupt {
            kind: "journal",
            id: self.id,
            detail: format!("bad date {:?}", self.date_str),
        })?;
        Ok(Journal {
            id: JournalId(self.id),
            project_id: ProjectId(self.project_id),
            date,
            content: self.content,
        })
    }
}

fn project_from_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: ProjectId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn recurrence_columns(
    rule: Option<&RecurrenceRule>,
) -> (Option<&'static str>, Option<i64>, Option<String>) {
    match rule {
        Some(rule) => (
            Some(rule.frequency.to_db_str()),
            rule.interval,
            rule.end_date.map(date_to_db),
        ),
        None => (None, None, None),
    }
}

fn load_project(conn: &Connection, id: ProjectId) -> Result<Option<Project>, StoreError> {
    let project = conn
        .query_row(
            "SELECT id, name, description FROM projects WHERE id = ?1",
            [id.0],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

fn load_task(conn: &Connection, id: TaskId) -> Result<Option<Task>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            [id.0],
            TaskRowData::from_row,
        )
        .optional()?;
    row.map(TaskRowData::into_task).transpose()
}

fn load_journal(conn: &Connection, id: JournalId) -> Result<Option<Journal>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, project_id, date, content FROM journals WHERE id = ?1",
            [id.0],
            JournalRowData::from_row,
        )
        .optional()?;
    row.map(JournalRowData::into_journal).transpose()
}

/// SQLite-backed [`Store`]. Holds a single connection for its lifetime.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`, including its
    /// parent directory and schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.init_schema()?;
        debug!(path = ?store.path, "opened database");
        Ok(store)
    }

    /// A private database that disappears when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl Store for SqliteStore {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM projects ORDER BY id ASC")?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    fn create_project(&mut self, draft: &ProjectDraft) -> Result<ProjectId, StoreError> {
        self.conn.execute(
            "INSERT INTO projects (name, description) VALUES (?1, ?2)",
            params![draft.name, draft.description],
        )?;
        let id = ProjectId(self.conn.last_insert_rowid());
        debug!(%id, "inserted project");
        Ok(id)
    }

    fn update_project(&mut self, id: ProjectId, patch: &ProjectPatch) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let mut project = load_project(&tx, id)?.ok_or(StoreError::NotFound {
            kind: "project",
            id: id.0,
        })?;
        project.apply(patch);
        tx.execute(
            "UPDATE projects SET name = ?1, description = ?2 WHERE id = ?3",
            params![project.name, project.description, id.0],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM projects WHERE id = ?1", [id.0])?;
        Ok(())
    }

    fn delete_project_with_tasks(&mut self, id: ProjectId) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM tasks WHERE project_id = ?1", [id.0])?;
        tx.execute("DELETE FROM projects WHERE id = ?1", [id.0])?;
        tx.commit()?;
        debug!(%id, removed, "deleted project with its tasks");
        Ok(removed)
    }

    fn list_tasks_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([project_id.0], TaskRowData::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_task()?);
        }
        Ok(result)
    }

    fn create_task(&mut self, draft: &TaskDraft) -> Result<TaskId, StoreError> {
        let (frequency, interval, end_date) = recurrence_columns(draft.recurrence.as_ref());
        self.conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                draft.project_id.0,
                draft.title,
                draft.description,
                date_to_db(draft.due_date),
                draft.priority.to_db_str(),
                draft.status.to_db_str(),
                frequency,
                interval,
                end_date,
            ],
        )?;
        let id = TaskId(self.conn.last_insert_rowid());
        debug!(%id, project_id = %draft.project_id, "inserted task");
        Ok(id)
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let mut task = load_task(&tx, id)?.ok_or(StoreError::NotFound {
            kind: "task",
            id: id.0,
        })?;
        task.apply(patch);

        let (frequency, interval, end_date) = recurrence_columns(task.recurrence.as_ref());
        tx.execute(
            "UPDATE tasks SET title = ?1, description = ?2, due_date = ?3, priority = ?4,
                 status = ?5, recurrence_frequency = ?6, recurrence_interval = ?7,
                 recurrence_end_date = ?8
             WHERE id = ?9",
            params![
                task.title,
                task.description,
                date_to_db(task.due_date),
                task.priority.to_db_str(),
                task.status.to_db_str(),
                frequency,
                interval,
                end_date,
                id.0,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id.0])?;
        Ok(())
    }

    fn delete_all_tasks_by_project(&mut self, project_id: ProjectId) -> Result<usize, StoreError> {
        // Dropping the transaction without commit rolls back, so an error
        // leaves every task in place.
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM tasks WHERE project_id = ?1", [project_id.0])?;
        tx.commit()?;
        debug!(%project_id, removed, "deleted tasks for project");
        Ok(removed)
    }

    fn list_journals_by_project(&self, project_id: ProjectId) -> Result<Vec<Journal>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, date, content FROM journals
             WHERE project_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([project_id.0], JournalRowData::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_journal()?);
        }
        Ok(result)
    }

    fn create_journal(&mut self, draft: &JournalDraft) -> Result<JournalId, StoreError> {
        self.conn.execute(
            "INSERT INTO journals (project_id, date, content) VALUES (?1, ?2, ?3)",
            params![draft.project_id.0, date_to_db(draft.date), draft.content],
        )?;
        let id = JournalId(self.conn.last_insert_rowid());
        debug!(%id, project_id = %draft.project_id, "inserted journal");
        Ok(id)
    }

    fn update_journal(&mut self, id: JournalId, patch: &JournalPatch) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let mut journal = load_journal(&tx, id)?.ok_or(StoreError::NotFound {
            kind: "journal",
            id: id.0,
        })?;
        journal.apply(patch);
        tx.execute(
            "UPDATE journals SET date = ?1, content = ?2 WHERE id = ?3",
            params![date_to_db(journal.date), journal.content, id.0],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_journal(&mut self, id: JournalId) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM journals WHERE id = ?1", [id.0])?;
        Ok(())
    }
}
