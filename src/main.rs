mod cli;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

use cli::{Cli, Commands, JournalCommand, ProjectCommand, RepeatArgs, TaskCommand};
use planboard::config::Config;
use planboard::dashboard::{Dashboard, DashboardError};
use planboard::model::{
    JournalDraft, JournalPatch, ProjectDraft, ProjectId, ProjectPatch, RecurrenceRule, TaskDraft,
    TaskPatch,
};
use planboard::storage::{SqliteStore, StoreError};
use planboard::utils::paths::get_logs_dir;
use planboard::views::{DueUrgency, journal_preview};

/// Initialize file-based logging.
///
/// Logs are written to ~/.planboard/logs/planboard.log (rolling daily).
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = match get_logs_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "planboard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn main() -> ExitCode {
    // Guard must be kept alive for the duration of the process
    let _log_guard = init_file_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<DashboardError>() {
            Some(DashboardError::Validation(e)) => {
                eprintln!("warning: {e}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let last_project = config.last_project;
    let db_path = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };

    let store = SqliteStore::open(&db_path)?;
    tracing::info!(path = ?db_path, "planboard starting");

    let mut board = Dashboard::new(store).with_occurrence_cap(config.occurrence_cap);
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Project { command } => {
            if let ProjectCommand::Rm { id } = &command {
                config.forget_project(*id);
            }
            handle_project(&mut board, &out, command)?
        }
        Commands::Task { command } => handle_task(&mut board, &out, &mut config, command)?,
        Commands::Journal { command } => handle_journal(&mut board, &out, &mut config, command)?,
        Commands::Upcoming => handle_upcoming(&board, &out)?,
        Commands::Report { project } => {
            let project = pick_project(&mut config, project)?;
            let name = board.project(project)?.name;
            let report = board.report(project)?;
            if out.json {
                out.print_json(&report)?;
            } else {
                println!("{name}");
                for (label, value) in report.rows() {
                    println!("  {label:<16} {value}");
                }
            }
        }
        Commands::Calendar { project, month } => {
            let project = pick_project(&mut config, project)?;
            let anchor = month.unwrap_or_else(today);
            let calendar = board.calendar(project, anchor)?;
            if out.json {
                out.print_json(&calendar)?;
            } else if calendar.is_empty() {
                println!("No tasks in {}-{:02}.", calendar.year, calendar.month);
            } else {
                for (date, entries) in &calendar.days {
                    println!("{}", date.format("%a %Y-%m-%d"));
                    for entry in entries {
                        println!("  #{} {}", entry.task_id, entry.title);
                    }
                }
            }
        }
    }

    board
        .into_store()
        .close()
        .context("Failed to close database")?;

    if config.last_project != last_project
        && let Err(e) = config.save()
    {
        tracing::warn!(error = %e, "could not remember last project");
    }
    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn done(&self, message: impl AsRef<str>) {
        if !self.json {
            println!("{}", message.as_ref());
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve the project a command acts on and mark it as the last one used.
/// `run` persists the choice once the command has succeeded.
fn pick_project(config: &mut Config, explicit: Option<ProjectId>) -> Result<ProjectId> {
    let id = config
        .project_or_last(explicit)
        .context("No project given and none used before; pass a project id")?;
    config.remember_project(id);
    Ok(id)
}

fn handle_project(
    board: &mut Dashboard<SqliteStore>,
    out: &Output,
    command: ProjectCommand,
) -> Result<()> {
    match command {
        ProjectCommand::List => {
            let projects = board.projects()?;
            if out.json {
                return out.print_json(&projects);
            }
            if projects.is_empty() {
                println!("No projects yet. Add one with `planboard project add <name>`.");
            }
            for project in projects {
                match project.description {
                    Some(description) => {
                        println!("#{} {} - {}", project.id, project.name, description)
                    }
                    None => println!("#{} {}", project.id, project.name),
                }
            }
        }
        ProjectCommand::Add { name, description } => {
            let draft = ProjectDraft {
                name,
                description,
            };
            let id = board.add_project(draft)?;
            out.done(format!("Project added (#{id})"));
        }
        ProjectCommand::Edit {
            id,
            name,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            board.edit_project(id, ProjectPatch { name, description })?;
            out.done("Project updated");
        }
        ProjectCommand::Rm { id } => {
            board.remove_project(id)?;
            out.done("Project deleted");
        }
    }
    Ok(())
}

fn recurrence_from_args(args: RepeatArgs) -> Option<RecurrenceRule> {
    args.repeat.map(|frequency| RecurrenceRule {
        frequency,
        interval: args.every,
        end_date: args.until,
    })
}

fn handle_task(
    board: &mut Dashboard<SqliteStore>,
    out: &Output,
    config: &mut Config,
    command: TaskCommand,
) -> Result<()> {
    match command {
        TaskCommand::List { project } => {
            let project = pick_project(config, project)?;
            let tasks = board.tasks(project)?;
            if out.json {
                return out.print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let repeat = match &task.recurrence {
                    Some(rule) if rule.is_recurring() => format!(" (repeats {})", rule.frequency),
                    _ => String::new(),
                };
                println!(
                    "#{} [{}] {} - due {} - {}{}",
                    task.id, task.status, task.title, task.due_date, task.priority, repeat
                );
            }
        }
        TaskCommand::Add {
            project,
            title,
            due,
            description,
            priority,
            status,
            repeat,
        } => {
            let draft = TaskDraft {
                project_id: pick_project(config, Some(project))?,
                title,
                description,
                due_date: due,
                priority,
                status,
                recurrence: recurrence_from_args(repeat),
            };
            let id = board.add_task(draft)?;
            out.done(format!("Task added (#{id})"));
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            clear_description,
            due,
            priority,
            status,
            repeat,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let recurrence = repeat.repeat.is_some().then(|| recurrence_from_args(repeat));
            let patch = TaskPatch {
                title,
                description,
                due_date: due,
                priority,
                status,
                recurrence,
            };
            board.edit_task(id, patch)?;
            out.done("Task updated");
        }
        TaskCommand::Toggle { project, id } => {
            let project = pick_project(config, Some(project))?;
            let task = board
                .tasks(project)?
                .into_iter()
                .find(|t| t.id == id)
                .ok_or(DashboardError::Store(StoreError::NotFound {
                    kind: "task",
                    id: id.0,
                }))?;
            let status = board.toggle_task_status(&task)?;
            out.done(format!("Task #{id} is now {status}"));
        }
        TaskCommand::Rm { id } => {
            board.remove_task(id)?;
            out.done("Task deleted");
        }
    }
    Ok(())
}

fn handle_journal(
    board: &mut Dashboard<SqliteStore>,
    out: &Output,
    config: &mut Config,
    command: JournalCommand,
) -> Result<()> {
    match command {
        JournalCommand::List { project } => {
            let project = pick_project(config, project)?;
            let journals = board.journals(project)?;
            if out.json {
                return out.print_json(&journals);
            }
            if journals.is_empty() {
                println!("No journal entries.");
            }
            for journal in journals {
                println!("#{} {} {}", journal.id, journal.date, journal_preview(&journal.content));
            }
        }
        JournalCommand::Add {
            project,
            content,
            date,
        } => {
            let project = pick_project(config, Some(project))?;
            let draft = JournalDraft::new(project, date.unwrap_or_else(today), content);
            let id = board.add_journal(draft)?;
            out.done(format!("Journal entry added (#{id})"));
        }
        JournalCommand::Edit { id, date, content } => {
            board.edit_journal(id, JournalPatch { date, content })?;
            out.done("Journal entry updated");
        }
        JournalCommand::Rm { id } => {
            board.remove_journal(id)?;
            out.done("Journal entry deleted");
        }
    }
    Ok(())
}

fn handle_upcoming(board: &Dashboard<SqliteStore>, out: &Output) -> Result<()> {
    let upcoming = board.upcoming()?;
    if out.json {
        return out.print_json(&upcoming);
    }
    if upcoming.is_empty() {
        println!("No pending tasks.");
        return Ok(());
    }

    let today = today();
    for item in &upcoming {
        let urgency = item.urgency(today);
        let marker = match urgency {
            DueUrgency::Overdue => "!",
            DueUrgency::Today => "*",
            DueUrgency::Tomorrow => "+",
            DueUrgency::Later => " ",
        };
        println!(
            "{marker} {}  {:<24} [{}] {} ({urgency})",
            item.due_date(),
            item.occurrence.task.title,
            item.project_name,
            item.occurrence.task.status,
        );
    }
    Ok(())
}
