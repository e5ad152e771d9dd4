#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use omw::editor::EditSurface;
use omw::store::{EntryLog, LogEntry, Store};
use omw::Error;
use tempfile::TempDir;

/// A timesheet in a scratch directory
pub struct TestSheet {
    dir: TempDir,
}

impl TestSheet {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("omw.toml")
    }

    pub fn store(&self) -> Store {
        Store::new(self.path())
    }

    pub fn write_entries(&self, entries: Vec<LogEntry>) -> std::io::Result<()> {
        let text = EntryLog::new(entries).encode().expect("encode log");
        fs::write(self.path(), text)
    }

    pub fn read_raw(&self) -> String {
        fs::read_to_string(self.path()).expect("read timesheet")
    }

    /// Files in the scratch directory other than the timesheet and its backup
    pub fn stray_files(&self) -> Vec<PathBuf> {
        let sheet = self.path();
        let backup = self.store().backup_path();
        fs::read_dir(self.dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| *path != sheet && *path != backup)
            .collect()
    }

    /// `omw` with the timesheet and config pinned to this directory
    pub fn omw_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("omw").expect("binary");
        cmd.env("OMW_FILE", self.path())
            .env("OMW_CONFIG", self.dir.path().join("config.toml"))
            .env_remove("OMW_TERM")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Local wall-clock time as stored in the timesheet
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .earliest()
        .expect("valid local time")
        .fixed_offset()
}

pub fn entry_with_id(id: &str, task: &str, end: DateTime<FixedOffset>) -> LogEntry {
    let mut entry = LogEntry::at(task, end);
    entry.id = id.to_string();
    entry
}

/// Edit surface that replaces the working copy with fixed text
pub struct ScriptedEdit {
    pub text: String,
    pub seen: RefCell<Option<PathBuf>>,
}

impl ScriptedEdit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            seen: RefCell::new(None),
        }
    }
}

impl EditSurface for ScriptedEdit {
    fn edit(&self, path: &Path) -> omw::Result<()> {
        *self.seen.borrow_mut() = Some(path.to_path_buf());
        fs::write(path, &self.text)?;
        Ok(())
    }
}

/// Edit surface that fails like a crashed editor
pub struct FailingEdit;

impl EditSurface for FailingEdit {
    fn edit(&self, path: &Path) -> omw::Result<()> {
        fs::write(path, "garbage that must never be committed")?;
        Err(Error::Editor("editor exited with exit code 1".to_string()))
    }
}
