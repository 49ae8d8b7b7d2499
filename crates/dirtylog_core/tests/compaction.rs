//! End-to-end compaction tests against files on disk.

use dirtylog_core::{CompactConfig, CompactError, Compactor, NoProgress, Strategy};
use dirtylog_testkit::prelude::*;
use std::fs;

#[test]
fn scenario_from_both_strategies() {
    let lines = [
        r#"{"key":"a","v":1}"#,
        r#"{"key":"b","v":1}"#,
        r#"{"key":"a","v":2}"#,
        "not json",
        r#"{"key":"b","v":2}"#,
    ];

    for strategy in [Strategy::Memory, Strategy::TwoPass] {
        let log = TempLog::from_lines(&lines);
        let report = Compactor::new(CompactConfig::new().strategy(strategy))
            .compact(log.path(), &mut NoProgress)
            .unwrap();

        assert_eq!(report.stats.lines_read, 5);
        assert_eq!(report.stats.unique_keys, 2);
        assert_eq!(report.stats.skipped(), 1);
        assert_eq!(report.output, log.output_path());

        let mut out = log.output_lines();
        out.sort();
        assert_eq!(out, vec![r#"{"key":"a","v":2}"#, r#"{"key":"b","v":2}"#]);
    }
}

#[test]
fn large_log_with_many_versions() {
    let mut lines = Vec::new();
    for i in 0..30_000u32 {
        lines.push(format!(r#"{{"key":"pad:{}","val":{{"rev":{}}}}}"#, i % 100, i));
    }
    let log = TempLog::from_lines(&lines);

    let report = Compactor::default()
        .compact(log.path(), &mut NoProgress)
        .unwrap();

    assert_eq!(report.stats.lines_read, 30_000);
    assert_eq!(report.stats.unique_keys, 100);
    assert_eq!(report.stats.obsolete_versions, 29_900);

    let out = log.output_lines();
    assert_eq!(out.len(), 100);
    assert_eq!(out[0], r#"{"key":"pad:0","val":{"rev":29900}}"#);
    assert_eq!(out[99], r#"{"key":"pad:99","val":{"rev":29999}}"#);
}

#[test]
fn non_utf8_line_is_skipped() {
    let mut content = b"{\"key\":\"a\",\"val\":1}\n".to_vec();
    content.extend_from_slice(&[0xc3, 0x28, b'\n']);
    content.extend_from_slice(b"{\"key\":\"b\",\"val\":2}\n");
    let log = TempLog::from_bytes(&content);

    let report = Compactor::default()
        .compact(log.path(), &mut NoProgress)
        .unwrap();

    assert_eq!(report.stats.skipped_invalid_json, 1);
    assert_eq!(log.output_lines().len(), 2);
}

#[test]
fn second_run_refuses_to_overwrite() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
    let compactor = Compactor::default();

    compactor.compact(log.path(), &mut NoProgress).unwrap();
    let first = log.read_output();

    let err = compactor.compact(log.path(), &mut NoProgress).unwrap_err();
    assert!(matches!(err, CompactError::OutputExists { .. }));
    assert_eq!(log.read_output(), first);
}

#[test]
fn custom_suffix() {
    let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
    let report = Compactor::new(CompactConfig::new().output_suffix(".compacted"))
        .compact(log.path(), &mut NoProgress)
        .unwrap();

    assert!(report.output.ends_with("dirty.db.compacted"));
    assert!(fs::metadata(&report.output).unwrap().is_file());
    assert!(!log.output_path().exists());
}
