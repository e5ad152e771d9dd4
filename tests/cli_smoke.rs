mod support;

use assert_cmd::Command;
use predicates::str::contains;

use omw::store::LogEntry;
use support::{local, TestSheet};

#[test]
fn omw_help_works() {
    Command::cargo_bin("omw")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Out of my way"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["add", "hello", "stretch", "report", "edit"] {
        Command::cargo_bin("omw")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn add_requires_a_task() {
    let sheet = TestSheet::new();
    sheet.omw_cmd().arg("add").assert().failure();
    assert!(!sheet.path().exists());
}

#[test]
fn add_appends_to_timesheet() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();

    sheet
        .omw_cmd()
        .args(["add", "write", "report"])
        .assert()
        .success()
        .stdout(contains("logged \"write report\""));
    sheet.omw_cmd().args(["add", "coffee", "**"]).assert().success();

    let log = sheet.store().read_all()?;
    let tasks: Vec<_> = log.entries.iter().map(|e| e.task.as_str()).collect();
    assert_eq!(tasks, vec!["write report", "coffee **"]);
    Ok(())
}

#[test]
fn add_json_envelope() {
    let sheet = TestSheet::new();
    sheet
        .omw_cmd()
        .args(["--json", "add", "standup"])
        .assert()
        .success()
        .stdout(contains("\"schema_version\": \"omw.v1\""))
        .stdout(contains("\"task\": \"standup\""));
}

#[test]
fn hello_then_stretch() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    sheet.omw_cmd().arg("hello").assert().success();
    sheet.omw_cmd().args(["add", "deploy"]).assert().success();
    sheet.omw_cmd().arg("stretch").assert().success();

    let log = sheet.store().read_all()?;
    let tasks: Vec<_> = log.entries.iter().map(|e| e.task.as_str()).collect();
    assert_eq!(tasks, vec!["hello", "deploy", "deploy"]);
    assert_ne!(log.entries[1].id, log.entries[2].id);
    Ok(())
}

#[test]
fn stretch_on_empty_log_is_a_user_error() {
    let sheet = TestSheet::new();
    sheet
        .omw_cmd()
        .arg("stretch")
        .assert()
        .code(2)
        .stderr(contains("Nothing to stretch"))
        .stderr(contains("hint: omw add"));
}

#[test]
fn json_errors_use_the_envelope() {
    let sheet = TestSheet::new();
    sheet
        .omw_cmd()
        .args(["--json", "stretch"])
        .assert()
        .code(2)
        .stdout(contains("\"status\": \"error\""))
        .stdout(contains("\"kind\": \"user_error\""))
        .stdout(contains("\"hint\": \"omw add <task>\""));
}

#[test]
fn report_rejects_bad_date() {
    let sheet = TestSheet::new();
    sheet
        .omw_cmd()
        .args(["report", "--from", "yesterday"])
        .assert()
        .code(2)
        .stderr(contains("yesterday"));
}

#[test]
fn report_formats() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    sheet.write_entries(vec![
        LogEntry::at("write report", local(2019, 1, 1, 9, 0)),
        LogEntry::at("coffee **", local(2019, 1, 1, 9, 30)),
        LogEntry::at("write report", local(2019, 1, 1, 10, 0)),
    ])?;

    sheet
        .omw_cmd()
        .args(["report", "--from", "2019-1-1"])
        .assert()
        .success()
        .stdout(contains("Total Task Hours: 30m0s"))
        .stdout(contains("Total Break Hours: 30m0s"))
        .stdout(contains("(30m0s) 9:00-9:30 -- coffee"));

    sheet
        .omw_cmd()
        .args(["report", "--from", "2019-1-1", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"breakTotalHours\": 1800"));

    sheet
        .omw_cmd()
        .args(["--json", "report", "--from", "2019-1-1"])
        .assert()
        .success()
        .stdout(contains("\"taskTotalHours\": 1800"));

    sheet
        .omw_cmd()
        .args(["report", "--from", "2019-1-1", "--format", "fc"])
        .assert()
        .success()
        .stdout(contains("\"classNames\":[\"breakEntry\"]"));
    Ok(())
}

#[test]
fn malformed_timesheet_fails_with_hint() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    std::fs::write(sheet.path(), "[[entries]\nid = ")?;
    sheet
        .omw_cmd()
        .args(["add", "anything"])
        .assert()
        .code(4)
        .stderr(contains("hint: omw edit"));
    Ok(())
}

#[test]
fn edit_with_failing_editor_keeps_timesheet() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    sheet.write_entries(vec![LogEntry::at("a", local(2019, 1, 1, 9, 0))])?;
    let before = sheet.read_raw();
    std::fs::write(
        sheet.dir().join("config.toml"),
        "[editor]\ncommand = \"false\"\nmax_attempts = 2\n",
    )?;

    if cfg!(unix) {
        sheet
            .omw_cmd()
            .arg("edit")
            .assert()
            .code(4)
            .stderr(contains("please retry editing (1/2)"));
        assert_eq!(sheet.read_raw(), before);
        assert!(!sheet.store().backup_path().exists());
    }
    Ok(())
}

#[test]
fn emptied_edit_points_at_the_timesheet() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    sheet.write_entries(vec![LogEntry::at("a", local(2019, 1, 1, 9, 0))])?;
    let before = sheet.read_raw();
    std::fs::write(
        sheet.dir().join("config.toml"),
        "[editor]\ncommand = \"truncate -s 0\"\n",
    )?;

    if cfg!(unix) {
        sheet
            .omw_cmd()
            .arg("edit")
            .assert()
            .code(2)
            .stderr(contains(format!("manually remove {}", sheet.path().display())))
            .stderr(contains(format!("hint: rm {}", sheet.path().display())));
        assert_eq!(sheet.read_raw(), before);
    }
    Ok(())
}

#[test]
fn invalid_config_is_a_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let sheet = TestSheet::new();
    std::fs::write(sheet.dir().join("config.toml"), "[editor]\nmax_attempts = \"many\"\n")?;
    sheet.omw_cmd().args(["add", "x"]).assert().code(2);
    Ok(())
}
