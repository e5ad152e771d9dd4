//! Validation of hand-edited timesheets
//!
//! An edited timesheet must still decode, and every id must stay unique.
//! Duplicate ids are repaired without asking: the first occurrence keeps
//! its id, later ones get fresh ids. Task timestamps are not checked for
//! ordering.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::{self, EntryLog};

/// An id replaced during duplicate repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRepair {
    /// Position of the entry in the log
    pub index: usize,
    pub old: String,
    pub new: String,
}

/// A decoded, repaired timesheet ready to be committed
#[derive(Debug, Clone)]
pub struct ValidatedEdit {
    pub log: EntryLog,
    pub repaired: Vec<IdRepair>,
}

/// Decode and repair the timesheet at `path`
///
/// Fails with `Error::Decode` when the text no longer parses (the user
/// should edit again) and `Error::EmptyResult` when nothing is left.
pub fn validate_edit(path: &Path) -> Result<ValidatedEdit> {
    let text = fs::read_to_string(path)?;
    let mut log = EntryLog::decode(&text)?;
    if log.is_empty() {
        return Err(Error::EmptyResult(path.to_path_buf()));
    }
    let repaired = repair_duplicate_ids(&mut log);
    Ok(ValidatedEdit { log, repaired })
}

/// Give every repeated id after its first occurrence a fresh id
pub fn repair_duplicate_ids(log: &mut EntryLog) -> Vec<IdRepair> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut repaired = Vec::new();

    for (index, entry) in log.entries.iter_mut().enumerate() {
        if seen.insert(entry.id.clone()) {
            continue;
        }
        let mut new = store::new_id();
        while seen.contains(&new) {
            new = store::new_id();
        }
        tracing::warn!(old = %entry.id, new = %new, "duplicate id found, fixing");
        seen.insert(new.clone());
        repaired.push(IdRepair {
            index,
            old: std::mem::replace(&mut entry.id, new.clone()),
            new,
        });
    }

    repaired
}
