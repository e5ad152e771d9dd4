mod support;

use std::collections::HashSet;
use std::fs;

use omw::lock::FileLock;
use omw::store::EntryLog;
use omw::Error;

use support::{entry_with_id, local, FailingEdit, ScriptedEdit, TestSheet};

fn seed(sheet: &TestSheet) {
    sheet
        .write_entries(vec![
            entry_with_id("a", "write report", local(2019, 1, 1, 9, 0)),
            entry_with_id("b", "coffee **", local(2019, 1, 1, 9, 30)),
        ])
        .expect("seed timesheet");
}

#[test]
fn edit_commits_and_writes_backup() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);
    let before = fs::read(sheet.path())?;

    let mut edited = EntryLog::decode(&sheet.read_raw())?;
    edited.entries[1].task = "lunch **".to_string();
    let surface = ScriptedEdit::new(edited.encode()?);

    let summary = sheet.store().edit(&surface)?;

    assert_eq!(summary.entries, 2);
    assert!(summary.repaired.is_empty());
    assert_eq!(summary.backup, sheet.store().backup_path());
    assert_eq!(fs::read(&summary.backup)?, before);

    let log = sheet.store().read_all()?;
    assert_eq!(log.entries[1].task, "lunch **");
    assert!(sheet.stray_files().is_empty());

    let working = surface.seen.borrow().clone().expect("surface was called");
    assert_eq!(working.parent(), sheet.path().parent());
    assert!(!working.exists());
    Ok(())
}

#[test]
fn edit_repairs_duplicate_ids() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);

    let mut edited = EntryLog::decode(&sheet.read_raw())?;
    edited.entries[1].id = "a".to_string();
    let summary = sheet.store().edit(&ScriptedEdit::new(edited.encode()?))?;

    assert_eq!(summary.repaired.len(), 1);
    assert_eq!(summary.repaired[0].old, "a");

    let log = sheet.store().read_all()?;
    assert_eq!(log.len(), 2);
    assert_eq!(log.entries[0].id, "a");
    assert_ne!(log.entries[1].id, "a");
    let ids: HashSet<_> = log.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    Ok(())
}

#[test]
fn editor_failure_requests_retry_and_keeps_original() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);
    let before = sheet.read_raw();

    let failure = sheet.store().edit(&FailingEdit).unwrap_err();

    assert!(failure.retry);
    assert!(matches!(failure.error, Error::Editor(_)));
    assert_eq!(sheet.read_raw(), before);
    assert!(!sheet.store().backup_path().exists());
    assert!(sheet.stray_files().is_empty());
    Ok(())
}

#[test]
fn malformed_edit_requests_retry() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);
    let before = sheet.read_raw();

    let failure = sheet
        .store()
        .edit(&ScriptedEdit::new("[[entries]\nid = \"a\""))
        .unwrap_err();

    assert!(failure.retry);
    assert!(matches!(failure.error, Error::Decode(_)));
    assert_eq!(sheet.read_raw(), before);
    assert!(!sheet.store().backup_path().exists());
    assert!(sheet.stray_files().is_empty());
    Ok(())
}

#[test]
fn emptied_edit_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);
    let before = sheet.read_raw();

    let failure = sheet.store().edit(&ScriptedEdit::new("")).unwrap_err();

    assert!(!failure.retry);
    assert!(matches!(&failure.error, Error::EmptyResult(path) if *path == sheet.path()));
    assert!(failure
        .error
        .to_string()
        .contains(&format!("manually remove {}", sheet.path().display())));
    assert_eq!(sheet.read_raw(), before);
    assert!(sheet.stray_files().is_empty());
    Ok(())
}

#[test]
fn edit_fails_when_timesheet_is_locked() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    seed(&sheet);

    let _held = FileLock::acquire(sheet.path())?;
    let surface = ScriptedEdit::new("");
    let failure = sheet.store().edit(&surface).unwrap_err();

    assert!(!failure.retry);
    assert!(matches!(failure.error, Error::LockFailed(_)));
    assert!(surface.seen.borrow().is_none());
    Ok(())
}

#[test]
fn edit_of_missing_timesheet_starts_empty() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    let mut log = EntryLog::default();
    log.push(entry_with_id("a", "first", local(2019, 1, 1, 9, 0)));

    let summary = sheet.store().edit(&ScriptedEdit::new(log.encode()?))?;

    assert_eq!(summary.entries, 1);
    assert_eq!(fs::read(&summary.backup)?, Vec::<u8>::new());
    assert_eq!(sheet.store().read_all()?, log);
    Ok(())
}
