//! Tests running the `dirty-compact` binary.

use dirtylog_testkit::prelude::*;
use std::path::Path;
use std::process::{Command, Output};

fn dirty_compact(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dirty-compact"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dirty-compact")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn compacts_scenario() {
    let log = TempLog::from_lines(&[
        r#"{"key":"a","v":1}"#,
        r#"{"key":"b","v":1}"#,
        r#"{"key":"a","v":2}"#,
        "not json",
        r#"{"key":"b","v":2}"#,
    ]);

    let output = dirty_compact(&[path_str(log.path())]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "stdout: {text}");
    assert!(text.contains("Read 5 lines, found 2 unique keys"), "{text}");
    assert!(text.contains("invalid JSON: 1"), "{text}");
    assert!(text.contains(&log.output_path().display().to_string()), "{text}");

    let mut lines = log.output_lines();
    lines.sort();
    assert_eq!(lines, vec![r#"{"key":"a","v":2}"#, r#"{"key":"b","v":2}"#]);
}

#[test]
fn missing_argument_prints_usage() {
    let output = dirty_compact(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn missing_input_creates_nothing() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
    let missing = log.dir().join("absent.db");

    let output = dirty_compact(&[path_str(&missing)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage"));
    assert!(!log.dir().join("absent.db.new").exists());
}

#[test]
fn existing_output_is_not_modified() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
    log.occupy_output(b"from a previous run\n");

    let output = dirty_compact(&[path_str(log.path())]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("already exists"));
    assert_eq!(log.read_output(), b"from a previous run\n");
}

#[test]
fn dry_run_leaves_no_output() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#, r#"{"key":"a","val":2}"#]);

    let output = dirty_compact(&["--dry-run", path_str(log.path())]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Would write 1 records"));
    assert!(!log.output_path().exists());
}

#[test]
fn two_pass_with_tombstone_removal() {
    let lines = [
        r#"{"key":"a","val":1}"#,
        r#"{"key":"b","val":1}"#,
        r#"{"key":"a"}"#,
    ];
    let log = TempLog::from_lines(&lines);

    let output = dirty_compact(&[
        "--strategy",
        "two-pass",
        "--remove-tombstones",
        path_str(log.path()),
    ]);

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).contains("Tombstones removed: 1"));
    assert_eq!(log.output_lines(), vec![r#"{"key":"b","val":1}"#]);
    assert_eq!(log.read_input(), join_lines(&lines).into_bytes());
}

#[test]
fn unknown_strategy_is_usage_error() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
    let output = dirty_compact(&["--strategy", "fast", path_str(log.path())]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!log.output_path().exists());
}

#[test]
fn help_exits_zero() {
    let output = dirty_compact(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("dirty-compact"));
}

#[test]
fn progress_dots_precede_summary() {
    let lines: Vec<String> = (0..25_000)
        .map(|i| format!(r#"{{"key":"k{}","val":{}}}"#, i % 50, i))
        .collect();
    let log = TempLog::from_lines(&lines);

    let output = dirty_compact(&[path_str(log.path())]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "{text}");
    let dots = text.find("\n..\n").expect("two progress dots on their own line");
    let summary = text
        .find("Read 25000 lines, found 50 unique keys")
        .expect("summary line");
    assert!(dots < summary, "{text}");
    assert_eq!(log.output_lines().len(), 50);
}
