//! Timesheet storage for omw
//!
//! The timesheet is a single TOML file holding every logged entry in
//! insertion order:
//!
//! ```text
//! [[entries]]
//! id = "8c1d3f2e-..."
//! end = "2019-01-01T09:00:00-05:00"
//! task = "write report"
//! ```
//!
//! Writers (`append`, the edit transaction) hold an exclusive lock on the
//! file for the whole read-modify-write. Readers don't lock: a report taken
//! while another process writes may see the previous content.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::editor::EditSurface;
use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::validate::{self, IdRepair};

/// Task text logged by `omw hello`
pub const HELLO_TASK: &str = "hello";

/// One logged task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Wall-clock time the entry was logged
    #[serde(deserialize_with = "deserialize_end")]
    pub end: DateTime<FixedOffset>,
    pub task: String,
}

impl LogEntry {
    /// New entry stamped with the current local time and a fresh id
    pub fn new(task: impl Into<String>) -> Self {
        Self::at(task, Local::now().fixed_offset())
    }

    /// New entry with a fresh id at an explicit time
    pub fn at(task: impl Into<String>, end: DateTime<FixedOffset>) -> Self {
        Self {
            id: new_id(),
            end,
            task: task.into(),
        }
    }
}

// `end` is written as an RFC 3339 string, but older timesheets and hand
// edits carry a native TOML offset datetime.
fn deserialize_end<'de, D>(deserializer: D) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match toml::Value::deserialize(deserializer)? {
        toml::Value::String(text) => text,
        toml::Value::Datetime(datetime) => datetime.to_string(),
        other => {
            return Err(D::Error::custom(format!(
                "end must be a datetime, found {}",
                other.type_str()
            )))
        }
    };
    DateTime::parse_from_rfc3339(&text)
        .map_err(|err| D::Error::custom(format!("invalid end time {text:?}: {err}")))
}

/// Generate a fresh entry id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The ordered contents of a timesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLog {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl EntryLog {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Decode timesheet text; an empty document is an empty log
    pub fn decode(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Encode the whole log as timesheet text
    pub fn encode(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

/// Failure of an edit transaction
///
/// `retry` tells the caller that reopening the editor may succeed: the
/// editor itself failed, or the edited text didn't decode.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct EditFailure {
    pub retry: bool,
    #[source]
    pub error: Error,
}

impl EditFailure {
    fn retry(error: Error) -> Self {
        Self { retry: true, error }
    }
}

impl From<Error> for EditFailure {
    fn from(error: Error) -> Self {
        Self {
            retry: false,
            error,
        }
    }
}

/// Result of a committed edit transaction
#[derive(Debug, Clone, Serialize)]
pub struct EditSummary {
    pub entries: usize,
    pub repaired: Vec<IdRepair>,
    pub backup: PathBuf,
}

/// Timesheet storage manager
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage.file.clone())
    }

    /// Path to the timesheet file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the previous content is copied to before an edit commits
    pub fn backup_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.bak", self.path.display()))
    }

    /// Append a task stamped with the current time
    ///
    /// Creates the timesheet if it doesn't exist. Fails with
    /// `Error::LockFailed` if another process is writing.
    pub fn append(&self, task: &str) -> Result<LogEntry> {
        self.append_entry(LogEntry::new(task))
    }

    /// Append a prepared entry under the timesheet lock
    pub fn append_entry(&self, entry: LogEntry) -> Result<LogEntry> {
        let mut lock = FileLock::acquire(&self.path)?;
        let mut log = EntryLog::decode(&lock.read_to_string()?)?;
        log.push(entry.clone());
        lock.rewrite(log.encode()?.as_bytes())?;
        tracing::debug!(
            path = %self.path.display(),
            id = %entry.id,
            entries = log.len(),
            "appended entry"
        );
        Ok(entry)
    }

    /// Log the start of a working day
    pub fn hello(&self) -> Result<LogEntry> {
        self.append(HELLO_TASK)
    }

    /// Read the whole timesheet without locking
    ///
    /// A missing file reads as an empty log.
    pub fn read_all(&self) -> Result<EntryLog> {
        match fs::read_to_string(&self.path) {
            Ok(text) => EntryLog::decode(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(EntryLog::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Re-log the most recent task with the current time
    pub fn stretch(&self) -> Result<LogEntry> {
        let log = self.read_all()?;
        let last = log
            .last()
            .ok_or_else(|| Error::EmptyLog("timesheet has no entries".to_string()))?;
        if last.task.is_empty() {
            return Err(Error::EmptyLog(
                "missing task description on the most recent entry".to_string(),
            ));
        }
        self.append(&last.task)
    }

    /// Run an edit transaction over the timesheet
    ///
    /// A missing timesheet is created empty first. The timesheet is copied next to itself, `surface` edits the copy, and
    /// the copy is validated. Only a valid, non-empty result replaces the
    /// timesheet, after the previous content has been copied to
    /// `backup_path()`. Any failure leaves the timesheet untouched and the
    /// working copy removed.
    pub fn edit(&self, surface: &dyn EditSurface) -> std::result::Result<EditSummary, EditFailure> {
        let _lock = FileLock::acquire(&self.path)?;
        let working = self.working_copy()?;
        tracing::debug!(working = %working.path().display(), "opening working copy");

        if let Err(err) = surface.edit(working.path()) {
            tracing::warn!(error = %err, "edit failed, discarding working copy");
            return Err(EditFailure::retry(err));
        }

        let _working_lock = FileLock::acquire(working.path())?;
        let validated = validate::validate_edit(working.path()).map_err(|err| match err {
            Error::Decode(_) => EditFailure::retry(err),
            // The working copy is gone once this returns; point at the timesheet.
            Error::EmptyResult(_) => EditFailure::from(Error::EmptyResult(self.path.clone())),
            other => EditFailure::from(other),
        })?;

        let entries = validated.log.len();
        let backup = self.commit(working, &validated.log)?;
        tracing::debug!(entries, backup = %backup.display(), "edit committed");

        Ok(EditSummary {
            entries,
            repaired: validated.repaired,
            backup,
        })
    }

    fn working_copy(&self) -> Result<NamedTempFile> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "omw".to_string());
        let working = tempfile::Builder::new()
            .prefix(&prefix)
            .tempfile_in(dir)?;
        fs::copy(&self.path, working.path())?;
        Ok(working)
    }

    // The working copy is written by path: editors commonly replace the
    // file instead of writing into the handle we created.
    fn commit(&self, working: NamedTempFile, log: &EntryLog) -> Result<PathBuf> {
        let encoded = log.encode()?;
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;
        fs::write(working.path(), encoded)?;
        working
            .persist(&self.path)
            .map_err(|err| Error::Io(err.error))?;
        Ok(backup)
    }
}
