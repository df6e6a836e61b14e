use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

pub const TODO_LIST_FILE: &str = "todo-list.json";
pub const MAX_TASKS_NUMBER: usize = 100_000;
pub const UNSTORED_CHANGES_LIMIT: usize = 20;

/// Line-driven to-do manager.
/// Reads one request per line from stdin; tasks live in ./todo-list.json or a path passed via --db.
#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Line-driven to-do manager")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, default_value = TODO_LIST_FILE)]
    pub db: PathBuf,

    /// Maximum number of live tasks.
    #[arg(long, default_value_t = MAX_TASKS_NUMBER)]
    pub max_tasks: usize,

    /// Save once more than this many changes are unsaved.
    #[arg(long, default_value_t = UNSTORED_CHANGES_LIMIT)]
    pub flush_threshold: usize,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// Runtime settings for a [`TaskManager`](crate::manager::TaskManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub max_tasks: usize,
    pub flush_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(TODO_LIST_FILE),
            max_tasks: MAX_TASKS_NUMBER,
            flush_threshold: UNSTORED_CHANGES_LIMIT,
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            db_path: cli.db.clone(),
            max_tasks: cli.max_tasks,
            flush_threshold: cli.flush_threshold,
        }
    }
}
