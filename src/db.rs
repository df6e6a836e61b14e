//! JSON file persistence for tasks.
//!
//! The on-disk format is a pretty-printed JSON array of task objects. Reading
//! is lenient about the deadline representation so files written by older
//! builds still load; writing always uses the day/month/year form.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::task::{Task, TaskError, DATE_FORMAT};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file is empty")]
    Empty,
}

/// A task object as read from disk. The stored id is ignored; loaded tasks
/// are always renumbered by the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskRecord {
    pub title: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub deadline: Option<String>,
}

impl TaskRecord {
    /// Validate the record into a task carrying `id`.
    pub fn into_task(self, id: u64) -> Result<Task, TaskError> {
        let deadline = self
            .deadline
            .as_deref()
            .map(parse_stored_deadline)
            .transpose()?
            .map(|d| d.format(DATE_FORMAT).to_string());
        let mut task = Task::new(
            id,
            self.title.as_deref(),
            self.details.as_deref(),
            deadline.as_deref(),
        )?;
        task.set_done(self.done);
        Ok(task)
    }
}

/// Read every task record stored at `path`, in file order.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>, DbError> {
    let buf = fs::read_to_string(path)?;
    if buf.trim().is_empty() {
        return Err(DbError::Empty);
    }
    let records: Option<Vec<TaskRecord>> = serde_json::from_str(&buf)?;
    records.ok_or(DbError::Empty)
}

/// Save tasks to `path` using atomic write (temp file + rename).
pub fn store_tasks<'a, I>(tasks: I, path: &Path) -> Result<(), DbError>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let data = serde_json::to_string_pretty(&tasks)?;

    let tmp = tmp_path(path);
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Accepts `dd/mm/yyyy`, ISO `yyyy-mm-dd`, and the `Dec 25, 2030 12:00:00 AM`
/// timestamp rendering found in legacy files.
pub fn parse_stored_deadline(raw: &str) -> Result<NaiveDate, TaskError> {
    let s = raw.trim().replace('\u{202f}', " ");
    if let Ok(d) = NaiveDate::parse_from_str(&s, DATE_FORMAT) {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(d);
    }
    ["%b %d, %Y %I:%M:%S %p", "%b %d, %Y, %I:%M:%S %p"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| TaskError::IllegalDate(raw.to_string()))
}
