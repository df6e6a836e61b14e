//! Enumerations used to filter tasks.

use std::str::FromStr;

use clap::ValueEnum;

use crate::task::Task;

/// Filter accepted by the `list` request.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListFlag {
    All,
    Done,
    Undone,
    Expired,
}

impl ListFlag {
    /// Whether `task` is selected by this flag; `expired` is the expired subset of `undone`.
    pub fn matches(self, task: &Task, expired: bool) -> bool {
        match self {
            ListFlag::All => true,
            ListFlag::Done => task.is_done(),
            ListFlag::Undone => !task.is_done(),
            ListFlag::Expired => !task.is_done() && expired,
        }
    }
}

impl FromStr for ListFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <ListFlag as ValueEnum>::from_str(s, true)
            .map_err(|_| format!("Unknown list flag '{}', expected all, done, undone or expired", s))
    }
}
