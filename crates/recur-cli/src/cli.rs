use clap::{Args, Parser, Subcommand};
use recur_core::models::TaskStatus;

/// Interval-based recurring tasks for Google Tasks
#[derive(Parser, Debug)]
#[command(name = "recur", author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create successors for recently completed recurring tasks, once
    Run(RunCommand),
    /// Run the recurrence scan on a fixed period until interrupted
    Watch(WatchCommand),
    /// Show all task lists
    Lists,
    /// Show the tasks in a list with their intervals
    Tasks(TasksCommand),
    /// Add a task, optionally recurring
    Add(AddCommand),
    /// Edit a task, including its interval
    Edit(EditCommand),
}

#[derive(Args, Debug, Clone)]
pub struct RunCommand {
    /// Report what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// How far back to look for completed tasks, in hours
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub lookback_hours: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct WatchCommand {
    /// Minutes between scans (defaults to the configured period)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub every: Option<u64>,

    /// Report what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many scans
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_runs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct TasksCommand {
    /// List id or title
    pub list: String,

    /// Include completed and hidden tasks
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddCommand {
    /// List id or title
    pub list: String,

    /// The title of the task
    pub title: String,

    /// Recur this many days after each completion
    #[arg(short, long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// Notes for the task
    #[arg(short, long)]
    pub notes: Option<String>,

    /// The due date of the task (e.g. "tomorrow", "2025-03-01")
    #[arg(short, long)]
    pub due: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditCommand {
    /// List id or title
    pub list: String,

    /// The id of the task to edit
    pub task_id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, conflicts_with = "notes")]
    pub notes_clear: bool,

    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, conflicts_with = "due")]
    pub due_clear: bool,

    /// Recur this many days after each completion
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<i64>,
    /// Stop the task from recurring
    #[arg(long, conflicts_with = "interval")]
    pub interval_clear: bool,

    /// New status (needsAction or completed)
    #[arg(long)]
    pub status: Option<TaskStatus>,
}
