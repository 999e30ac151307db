use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use planboard::model::{Frequency, JournalId, Priority, ProjectId, TaskId, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "planboard")]
#[command(about = "Projects, tasks and journals with recurring schedules", long_about = None)]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Manage a project's tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Manage a project's journal
    Journal {
        #[command(subcommand)]
        command: JournalCommand,
    },
    /// Open tasks across all projects, recurring ones expanded
    Upcoming,
    /// Task and journal counts for a project
    Report {
        /// Project id (default: the last project used)
        project: Option<ProjectId>,
    },
    /// A project's tasks laid out by day for one month
    Calendar {
        /// Project id (default: the last project used)
        project: Option<ProjectId>,
        /// Month as YYYY-MM (default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Edit {
        id: ProjectId,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a project and its tasks (journal entries are kept)
    Rm { id: ProjectId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RepeatArgs {
    /// Recurrence frequency: none, daily, weekly or custom
    #[arg(long)]
    pub repeat: Option<Frequency>,
    /// Step between occurrences (days, or weeks for weekly)
    #[arg(long, requires = "repeat", allow_negative_numbers = true)]
    pub every: Option<i64>,
    /// Last date an occurrence may fall on
    #[arg(long, requires = "repeat")]
    pub until: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    List {
        /// Project id (default: the last project used)
        project: Option<ProjectId>,
    },
    Add {
        project: ProjectId,
        title: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: NaiveDate,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value = "Normal")]
        priority: Priority,
        #[arg(short, long, default_value = "Pending")]
        status: TaskStatus,
        #[command(flatten)]
        repeat: RepeatArgs,
    },
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
        #[command(flatten)]
        repeat: RepeatArgs,
    },
    /// Flip a task between completed and pending
    Toggle {
        project: ProjectId,
        id: TaskId,
    },
    Rm {
        id: TaskId,
    },
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    List {
        /// Project id (default: the last project used)
        project: Option<ProjectId>,
    },
    Add {
        project: ProjectId,
        content: String,
        /// Entry date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Edit {
        id: JournalId,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        content: Option<String>,
    },
    Rm {
        id: JournalId,
    },
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month (expected YYYY-MM): {s}"))
}
