//! # todo - line-driven to-do manager
//!
//! Reads one request per line from stdin and keeps the task list in a single
//! JSON file (`./todo-list.json` unless `--db` says otherwise).
//!
//! ## Requests
//!
//! ```text
//! add [junk] -t <title...> [-dt <details...>] [-dl <dd/mm/yyyy>]
//! remove <id> [<id> ...]
//! done <id> [<id> ...]
//! list [all|done|undone|expired ...]
//! load <path> [<path> ...]
//! exit
//! ```
//!
//! Removals and completions are staged and only applied when the list is
//! printed or the file is written. The file is written once more than
//! `--flush-threshold` changes are unsaved, and always once on the way out,
//! whether the loop ended through `exit`, end of input, or a read error.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` (for example
//! `RUST_LOG=todo=debug`) to change what is shown.

pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod manager;
pub mod parser;
pub mod task;

pub use cli::Config;
pub use manager::{ManagerError, TaskManager};
pub use task::{Task, TaskError};
