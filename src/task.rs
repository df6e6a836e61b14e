//! Task data structure and related functionality.
//!
//! A [`Task`] can only be obtained through its validating constructor, so every
//! task held by the manager respects the title and details size limits.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const TITLE_MAX_SIZE: usize = 20;
pub const DETAILS_MAX_SIZE: usize = 200;
/// Day/month/year, the format deadlines are typed and displayed in.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const DEFAULT_TITLE: &str = "Untitled";

const SEPARATOR: &str = "############";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Illegal date format: '{0}', expected dd/mm/yyyy")]
    IllegalDate(String),
    #[error("Title size cannot exceed {}", TITLE_MAX_SIZE)]
    TitleTooLong,
    #[error("Details size cannot exceed {}", DETAILS_MAX_SIZE)]
    DetailsTooLong,
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: u64,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    done: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_deadline"
    )]
    deadline: Option<NaiveDate>,
}

impl Task {
    /// A bare task carrying only an id and the default title.
    pub fn with_id(id: u64) -> Self {
        Task {
            id,
            title: DEFAULT_TITLE.to_string(),
            details: None,
            done: false,
            deadline: None,
        }
    }

    /// Build a validated task.
    ///
    /// An empty or missing title becomes [`DEFAULT_TITLE`]. The deadline is
    /// checked before the size limits, so a task that is wrong on several
    /// counts reports its date first.
    pub fn new(
        id: u64,
        title: Option<&str>,
        details: Option<&str>,
        deadline: Option<&str>,
    ) -> Result<Self, TaskError> {
        let mut task = Task::with_id(id);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            task.title = title.to_string();
        }
        task.details = details.map(str::to_string);
        task.deadline = deadline.map(parse_deadline).transpose()?;

        if task.title.chars().count() > TITLE_MAX_SIZE {
            return Err(TaskError::TitleTooLong);
        }
        if task
            .details
            .as_ref()
            .is_some_and(|d| d.chars().count() > DETAILS_MAX_SIZE)
        {
            return Err(TaskError::DetailsTooLong);
        }

        Ok(task)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// True once the current local time has passed the start of the deadline day.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now().naive_local())
    }

    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.deadline
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .is_some_and(|start| now > start)
    }

    /// Render the task as a block of lines, each ending in a newline.
    pub fn display(&self) -> String {
        self.display_at(Local::now().naive_local())
    }

    pub fn display_at(&self, now: NaiveDateTime) -> String {
        let mut out = format!("{SEPARATOR}\nTask {}", self.id);
        if self.done {
            out.push_str(" (done)");
        } else if self.is_expired_at(now) {
            out.push_str(" (expired)");
        }
        out.push_str(&format!("\n\"{}\"\n", self.title));
        if let Some(details) = self.details.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(details);
            out.push('\n');
        }
        out.push_str(&format!("Deadline: {}\n", format_deadline(self.deadline)));
        out
    }
}

/// Parse a typed deadline. Only the first token is read, so
/// `25/12/2030 evening` is accepted as the 25th of December.
pub fn parse_deadline(s: &str) -> Result<NaiveDate, TaskError> {
    let token = s.split_whitespace().next().unwrap_or_default();
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| TaskError::IllegalDate(s.to_string()))
}

pub fn format_deadline(deadline: Option<NaiveDate>) -> String {
    match deadline {
        Some(d) => d.format(DATE_FORMAT).to_string(),
        None => "no".into(),
    }
}

fn serialize_deadline<S: Serializer>(
    deadline: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_deadline(*deadline))
}
