use std::ffi::OsString;
use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use daybook_core::cli::Command;
use daybook_core::commands::dispatch;
use daybook_core::datastore::FileStorage;
use daybook_core::render::Renderer;
use daybook_model::store::decode_tasks;
use daybook_model::{AppState, KeyValueStore, ThemeMode};
use tempfile::tempdir;

fn may(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
}

#[test]
fn state_survives_reopening_the_data_dir() {
    let temp = tempdir().expect("tempdir");
    let now = Utc
        .with_ymd_and_hms(2024, 5, 9, 12, 0, 0)
        .single()
        .expect("valid now");

    {
        let storage = FileStorage::open(temp.path()).expect("open storage");
        let mut state = AppState::load(storage, may(9));
        let mut renderer = Renderer::new(false, state.theme());
        let mut out = Vec::new();
        dispatch(
            &mut state,
            &mut renderer,
            Command::Add {
                text: vec!["Buy milk".to_string()],
                date: Some("2024-05-10".to_string()),
            },
            may(9),
            now,
            &mut out,
        )
        .expect("add task");
        dispatch(
            &mut state,
            &mut renderer,
            Command::Theme { toggle: true },
            may(9),
            now,
            &mut out,
        )
        .expect("toggle theme");
    }

    let storage = FileStorage::open(temp.path()).expect("reopen storage");
    let raw = storage
        .get_item("tasks")
        .expect("read tasks")
        .expect("tasks persisted");
    let tasks = decode_tasks(&raw).expect("decode tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Buy milk");
    assert!(!tasks[0].completed);

    let state = AppState::load(storage, may(10));
    assert_eq!(state.theme(), ThemeMode::Dark);
    assert_eq!(
        state.summary_message(),
        "Summary for May 10, 2024: Total tasks: 1, Completed: 0, Pending: 1."
    );
    assert!(state.calendar().cells().any(|cell| cell.has_marker()));
}

#[test]
fn corrupt_task_file_starts_empty() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join("tasks.data"), "[{\"id\":").expect("write garbage");

    let storage = FileStorage::open(temp.path()).expect("open storage");
    let state = AppState::load(storage, may(10));
    assert!(state.tasks().is_empty());
    assert!(state.task_list().is_empty());
}

#[test]
fn run_writes_into_the_requested_data_dir() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("daybookrc");
    fs::write(&rc, "color = off\n").expect("write rc");
    let data = temp.path().join("data");

    let args = [
        "daybook",
        "--daybookrc",
        rc.to_str().expect("utf8 path"),
        "--data",
        data.to_str().expect("utf8 path"),
        "--on",
        "2024-05-10",
        "add",
        "Water",
        "plants",
    ];
    daybook_core::run(args.iter().map(OsString::from).collect()).expect("run add");

    let raw = fs::read_to_string(data.join("tasks.data")).expect("tasks file");
    let tasks = decode_tasks(&raw).expect("decode tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Water plants");
    assert_eq!(tasks[0].date, may(10));
}

#[test]
fn blank_task_reports_bare_validation_message() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("daybookrc");
    fs::write(&rc, "color = off\n").expect("write rc");
    let data = temp.path().join("data");

    let args = [
        "daybook",
        "--daybookrc",
        rc.to_str().expect("utf8 path"),
        "--data",
        data.to_str().expect("utf8 path"),
        "--on",
        "2024-05-10",
        "add",
        "   ",
    ];
    let err = daybook_core::run(args.iter().map(OsString::from).collect())
        .expect_err("blank task rejected");

    assert_eq!(
        daybook_core::error_message(&err),
        "Task description cannot be empty."
    );
    assert!(!data.join("tasks.data").exists());
}

#[test]
fn other_failures_keep_the_error_prefix() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("daybookrc");
    fs::write(&rc, "color = off\n").expect("write rc");
    let data = temp.path().join("data");

    let args = [
        "daybook",
        "--daybookrc",
        rc.to_str().expect("utf8 path"),
        "--data",
        data.to_str().expect("utf8 path"),
        "--on",
        "+99999999d",
        "list",
    ];
    let err = daybook_core::run(args.iter().map(OsString::from).collect())
        .expect_err("offset rejected");

    let message = daybook_core::error_message(&err);
    assert!(message.starts_with("error: invalid --on date"));
    assert!(message.contains("date offset out of range"));
}
