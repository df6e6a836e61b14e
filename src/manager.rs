//! The task store.
//!
//! [`TaskManager`] owns the live tasks, hands out ids, and batches removals
//! and completions until something needs to observe them. Staged changes are
//! applied by [`TaskManager::push_changes`], which runs before every listing
//! and every save. Saving itself is deferred until more than
//! `flush_threshold` modifications have piled up, or until it is forced.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cli::Config;
use crate::db::{self, DbError};
use crate::fields::ListFlag;
use crate::parser::{OptionParser, ParseError};
use crate::task::{Task, TaskError};

const ADD_REQUEST_OPTIONS: [&str; 3] = ["-t", "-dt", "-dl"];

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("No task with id {0}")]
    NotFound(u64),
    #[error("The task is not saved as the maximum possible tasks number is {0}")]
    Capacity(usize),
    #[error("Couldn't parse add request options: {0}")]
    Parse(#[from] ParseError),
    #[error("Couldn't parse add request options: {0}")]
    Task(#[from] TaskError),
}

/// Staged changes not yet applied to the live tasks.
#[derive(Debug, Default)]
struct Pending {
    remove: BTreeSet<u64>,
    done: BTreeSet<u64>,
}

#[derive(Debug)]
pub struct TaskManager {
    config: Config,
    /// Keyed by id, so iteration order is id order.
    tasks: BTreeMap<u64, Task>,
    pending: Pending,
    modifications: usize,
    add_parser: OptionParser,
}

impl TaskManager {
    pub fn new(config: Config) -> Self {
        TaskManager {
            config,
            tasks: BTreeMap::new(),
            pending: Pending::default(),
            modifications: 0,
            add_parser: OptionParser::new(ADD_REQUEST_OPTIONS),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Live tasks in id order, staged changes not applied.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn task_exists(&self, id: u64) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Modifications made since the last successful save.
    pub fn modifications(&self) -> usize {
        self.modifications
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.remove.is_empty() || !self.pending.done.is_empty()
    }

    /// One past the highest live id, or 1 for an empty store.
    pub fn next_id(&self) -> u64 {
        self.tasks.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Append the tasks stored at `path`, renumbering them from [`Self::next_id`].
    ///
    /// Problems with the file are logged and yield an empty load. Records that
    /// fail validation are skipped. If the file holds more tasks than there is
    /// room for, the tail is dropped. Returns the tasks actually appended.
    pub fn load(&mut self, path: &Path) -> Vec<Task> {
        let records = match db::load_tasks(path) {
            Ok(records) => {
                info!("Loaded tasks from file {} successfully", path.display());
                records
            }
            Err(e) => {
                warn!("Couldn't load tasks list from {}: {e}", path.display());
                Vec::new()
            }
        };

        let mut loaded: Vec<Task> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match record.into_task(0) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!("Skipping task #{} in {}: {e}", i + 1, path.display());
                    None
                }
            })
            .collect();

        if loaded.is_empty() {
            warn!("{} does not contain tasks", path.display());
        }
        let left = self.config.max_tasks.saturating_sub(self.tasks.len());
        if loaded.len() > left {
            loaded.truncate(left);
            warn!(
                "not all tasks were loaded as the maximum possible tasks number is {}",
                self.config.max_tasks
            );
        }

        for task in loaded.iter_mut() {
            task.set_id(self.next_id());
            self.tasks.insert(task.id(), task.clone());
        }
        loaded
    }

    /// Create a task from `-t`, `-dt` and `-dl` options in `request`. Returns the new id.
    pub fn add(&mut self, request: &str) -> Result<u64, ManagerError> {
        let options = self.add_parser.parse(request)?;
        let task = Task::new(
            self.next_id(),
            options.get("-t").map(String::as_str),
            options.get("-dt").map(String::as_str),
            options.get("-dl").map(String::as_str),
        )?;

        if self.tasks.len() >= self.config.max_tasks {
            return Err(ManagerError::Capacity(self.config.max_tasks));
        }
        let id = task.id();
        self.tasks.insert(id, task);
        self.record_modification();
        Ok(id)
    }

    /// Stage `id` for removal. Any staged completion of the same id is dropped.
    pub fn remove(&mut self, id: u64) -> Result<(), ManagerError> {
        if !self.task_exists(id) {
            return Err(ManagerError::NotFound(id));
        }
        self.pending.done.remove(&id);
        self.pending.remove.insert(id);
        self.record_modification();
        Ok(())
    }

    /// Stage `id` to be marked done.
    pub fn mark_as_done(&mut self, id: u64) -> Result<(), ManagerError> {
        if !self.task_exists(id) {
            return Err(ManagerError::NotFound(id));
        }
        self.pending.done.insert(id);
        self.record_modification();
        Ok(())
    }

    /// Apply staged changes, then render every task matching any of `flags`.
    /// No flags means [`ListFlag::All`].
    pub fn list(&mut self, flags: &[ListFlag]) -> String {
        self.list_at(flags, Local::now().naive_local())
    }

    pub fn list_at(&mut self, flags: &[ListFlag], now: NaiveDateTime) -> String {
        let flags: &[ListFlag] = if flags.is_empty() { &[ListFlag::All] } else { flags };
        self.push_changes();

        self.tasks
            .values()
            .filter(|task| {
                let expired = task.is_expired_at(now);
                flags.iter().any(|flag| flag.matches(task, expired))
            })
            .map(|task| task.display_at(now))
            .collect()
    }

    /// Drop staged removals and mark staged completions, then clear both.
    pub fn push_changes(&mut self) {
        let Pending { remove, done } = std::mem::take(&mut self.pending);
        if !remove.is_empty() || !done.is_empty() {
            debug!(removed = remove.len(), done = done.len(), "pushing staged changes");
        }

        self.tasks.retain(|id, _| !remove.contains(id));
        for id in done {
            if let Some(task) = self.tasks.get_mut(&id) {
                task.set_done(true);
            }
        }
    }

    /// Save to the configured file when `forced` or when too many changes are unsaved.
    ///
    /// Returns whether a save happened. A failed save keeps the modification
    /// count, so the next change tries again.
    pub fn store_changes(&mut self, forced: bool) -> Result<bool, DbError> {
        if !forced && self.modifications <= self.config.flush_threshold {
            return Ok(false);
        }

        let path = self.config.db_path.clone();
        info!("Saving latest changes to {}...", path.display());
        self.push_changes();
        db::store_tasks(self.tasks.values(), &path)?;
        self.modifications = 0;
        info!("Changes were saved successfully");
        Ok(true)
    }

    fn record_modification(&mut self) {
        self.modifications += 1;
        if let Err(e) = self.store_changes(false) {
            error!(
                "Couldn't save changes to {}: {e}",
                self.config.db_path.display()
            );
        }
    }
}
