use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use planboard::dashboard::{Dashboard, DashboardError};
use planboard::model::{
    Frequency, JournalDraft, Priority, ProjectDraft, RecurrenceRule, TaskDraft, TaskStatus,
    ValidationError,
};
use planboard::recurrence::{expand, sort_occurrences};
use planboard::storage::{SqliteStore, Store};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn day_strings(dates: impl IntoIterator<Item = NaiveDate>) -> Vec<String> {
    dates
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

#[test]
fn upcoming_view_across_projects() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("board.db")).unwrap();
    let mut board = Dashboard::new(store);

    let home = board.add_project(ProjectDraft::new("Home")).unwrap();
    let work = board
        .add_project(ProjectDraft::new("Work").with_description("Day job"))
        .unwrap();

    board
        .add_task(
            TaskDraft::new(home, "Take out bins", date("2024-01-01")).with_recurrence(
                RecurrenceRule::new(Frequency::Daily)
                    .every(2)
                    .until(date("2024-01-05")),
            ),
        )
        .unwrap();
    board
        .add_task(
            TaskDraft::new(work, "Team sync", date("2024-01-01")).with_recurrence(
                RecurrenceRule::new(Frequency::Weekly)
                    .every(1)
                    .until(date("2024-01-22")),
            ),
        )
        .unwrap();
    board
        .add_task(
            TaskDraft::new(work, "Old ticket", date("2024-01-02"))
                .with_status(TaskStatus::Completed),
        )
        .unwrap();
    board
        .add_task(
            TaskDraft::new(work, "Quarterly plan", date("2024-01-03"))
                .with_priority(Priority::High),
        )
        .unwrap();

    let upcoming = board.upcoming().unwrap();
    let rows: Vec<(String, String, String)> = upcoming
        .iter()
        .map(|u| {
            (
                u.due_date().format("%Y-%m-%d").to_string(),
                u.occurrence.task.title.clone(),
                u.project_name.clone(),
            )
        })
        .collect();

    let row = |d: &str, t: &str, p: &str| (d.to_string(), t.to_string(), p.to_string());
    assert_eq!(
        rows,
        vec![
            row("2024-01-01", "Take out bins", "Home"),
            row("2024-01-01", "Team sync", "Work"),
            row("2024-01-03", "Take out bins", "Home"),
            row("2024-01-03", "Quarterly plan", "Work"),
            row("2024-01-05", "Take out bins", "Home"),
            row("2024-01-08", "Team sync", "Work"),
            row("2024-01-15", "Team sync", "Work"),
            row("2024-01-22", "Team sync", "Work"),
        ]
    );

    // Occurrences are display-only: the store still holds the templates.
    assert_eq!(board.tasks(home).unwrap().len(), 1);
    assert_eq!(board.tasks(work).unwrap().len(), 3);

    board.into_store().close().unwrap();
}

#[test]
fn deleting_a_project_empties_its_task_lookup() {
    let mut board = Dashboard::new(SqliteStore::open_in_memory().unwrap());
    let project = board.add_project(ProjectDraft::new("Temp")).unwrap();
    for i in 0..5 {
        board
            .add_task(TaskDraft::new(project, format!("task {i}"), date("2024-06-01")))
            .unwrap();
    }
    board
        .add_journal(JournalDraft::new(project, date("2024-06-01"), "left behind"))
        .unwrap();

    board.remove_project(project).unwrap();

    let store = board.into_store();
    assert!(store.list_tasks_by_project(project).unwrap().is_empty());
    assert!(store.list_projects().unwrap().is_empty());
    assert_eq!(store.list_journals_by_project(project).unwrap().len(), 1);
}

#[test]
fn validation_errors_name_the_field() {
    let mut board = Dashboard::new(SqliteStore::open_in_memory().unwrap());
    let project = board.add_project(ProjectDraft::new("P")).unwrap();

    let err = board
        .add_journal(JournalDraft::new(project, date("2024-01-01"), "x".repeat(2001)))
        .unwrap_err();
    match err {
        DashboardError::Validation(ValidationError::TooLong { field, max, actual }) => {
            assert_eq!((field, max, actual), ("journal content", 2000, 2001));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(board.journals(project).unwrap().is_empty());
}

#[test]
fn expansion_scenarios_from_stored_templates() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let project = store.create_project(&ProjectDraft::new("P")).unwrap();
    store
        .create_task(
            &TaskDraft::new(project, "forever", date("2024-01-01"))
                .with_recurrence(RecurrenceRule::new(Frequency::Daily).every(1)),
        )
        .unwrap();

    let tasks = store.list_tasks_by_project(project).unwrap();
    let mut occurrences = expand(&tasks);
    sort_occurrences(&mut occurrences);

    assert_eq!(occurrences.len(), 100);
    assert_eq!(
        day_strings(occurrences.iter().take(3).map(|o| o.due_date())),
        vec!["2024-01-01", "2024-01-02", "2024-01-03"]
    );
    assert_eq!(expand(&tasks), expand(&tasks));
}
