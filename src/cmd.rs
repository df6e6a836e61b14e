//! Request handling for the read-eval loop.
//!
//! Each input line is classified into a [`Request`] by its leading verb and
//! then executed against the [`TaskManager`]. Every outcome, success or
//! failure, is reported on stdout; nothing here ends the loop except `exit`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap_complete::{generate, Shell};
use thiserror::Error;

use crate::fields::ListFlag;
use crate::manager::TaskManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Stop reading requests.
    Exit,
    /// Append the tasks stored in each file.
    Load(Vec<PathBuf>),
    /// Create a task; carries the text after the verb.
    Add(String),
    /// Stage tasks for removal.
    Remove(Vec<u64>),
    /// Stage tasks to be marked done.
    Done(Vec<u64>),
    /// Print tasks; carries the raw filter tokens.
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Only id numbers expected in this request")]
    NumbersExpected,
    #[error("Unsupported operation")]
    Unsupported,
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match verb {
            "exit" => Ok(Request::Exit),
            "load" => Ok(Request::Load(args(rest).map(PathBuf::from).collect())),
            "add" => Ok(Request::Add(rest.to_string())),
            "remove" => parse_ids(rest).map(Request::Remove),
            "done" => parse_ids(rest).map(Request::Done),
            "list" => Ok(Request::List(args(rest).map(str::to_string).collect())),
            _ => Err(RequestError::Unsupported),
        }
    }
}

fn args(rest: &str) -> impl Iterator<Item = &str> {
    rest.split_whitespace()
}

/// All-or-nothing: one bad token rejects the whole request.
/// Ids are unsigned, so `-1` is a bad token rather than an unknown id.
fn parse_ids(rest: &str) -> Result<Vec<u64>, RequestError> {
    args(rest)
        .map(|token| token.parse::<u64>().map_err(|_| RequestError::NumbersExpected))
        .collect()
}

/// Handle one input line. Returns `false` once the loop should stop.
pub fn process_request(manager: &mut TaskManager, line: &str) -> bool {
    match line.parse::<Request>() {
        Ok(request) => execute(manager, request),
        Err(e) => {
            println!("{e}");
            true
        }
    }
}

pub fn execute(manager: &mut TaskManager, request: Request) -> bool {
    match request {
        Request::Exit => return false,
        Request::Load(paths) => {
            for path in paths {
                cmd_load(manager, &path);
            }
        }
        Request::Add(rest) => cmd_add(manager, &rest),
        Request::Remove(ids) => {
            for id in ids {
                cmd_remove(manager, id);
            }
        }
        Request::Done(ids) => {
            for id in ids {
                cmd_done(manager, id);
            }
        }
        Request::List(tokens) => cmd_list(manager, &tokens),
    }
    true
}

pub fn cmd_load(manager: &mut TaskManager, path: &Path) {
    let loaded = manager.load(path);
    println!("Loaded {} task(s) from {}", loaded.len(), path.display());
}

pub fn cmd_add(manager: &mut TaskManager, request: &str) {
    match manager.add(request) {
        Ok(id) => println!("Task {id} was added successfully"),
        Err(e) => println!("{e}"),
    }
}

pub fn cmd_remove(manager: &mut TaskManager, id: u64) {
    match manager.remove(id) {
        Ok(()) => println!("Task {id} was removed successfully"),
        Err(e) => println!("{e}"),
    }
}

pub fn cmd_done(manager: &mut TaskManager, id: u64) {
    match manager.mark_as_done(id) {
        Ok(()) => println!("Task {id} was marked as done"),
        Err(e) => println!("{e}"),
    }
}

/// Print the listing. Unknown flags are reported and match nothing, so a
/// request made only of unknown flags prints no tasks but still applies
/// staged changes.
pub fn cmd_list(manager: &mut TaskManager, tokens: &[String]) {
    let mut flags = Vec::new();
    for token in tokens {
        match token.parse::<ListFlag>() {
            Ok(flag) => flags.push(flag),
            Err(e) => println!("{e}"),
        }
    }
    if !tokens.is_empty() && flags.is_empty() {
        manager.push_changes();
        return;
    }
    print!("{}", manager.list(&flags));
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
