//! CLI Integration Tests
//!
//! Runs the eod-report binary through assert_cmd.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

mod common;

use assert_cmd::Command;
use eod_report::excel::ReportExporter;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DISPATCH_JSON: &str = r#"{"sheets":[{"name":"Dispatch","rows":[
    {"Tour":"City Tour","Adult":10,"Child":2},
    {"Tour":"City Tour","Adult":5,"Child":0},
    {"Tour":"Harbour Walk","Adult":4,"Child":1},
    {"Tour":"Beach Trip","Adult":0,"Child":0}
]}]}"#;

fn eod() -> Command {
    let mut cmd = Command::cargo_bin("eod-report").unwrap();
    cmd.env_remove("EOD_LAYOUT").env_remove("RUST_LOG");
    cmd
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let dispatch = dir.join("dispatch.json");
    fs::write(&dispatch, DISPATCH_JSON).unwrap();
    let template = dir.join("template.xlsx");
    ReportExporter::new(&common::template())
        .export(&template)
        .unwrap();
    (dispatch, template)
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    eod()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eod-report"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    eod()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eod-report"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LAYOUT AND EXTRACT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_layout_prints_defaults() {
    eod()
        .arg("layout")
        .assert()
        .success()
        .stdout(predicate::str::contains("start_row: 17"))
        .stdout(predicate::str::contains("{{tour_name}}"))
        .stdout(predicate::str::contains("overflow_rows: 500"));
}

#[test]
fn test_extract_json_output() {
    let dir = TempDir::new().unwrap();
    let (dispatch, _) = write_inputs(dir.path());

    let output = eod()
        .arg("extract")
        .arg(&dispatch)
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert_eq!(records[0]["tour_name"], "City Tour");
    assert_eq!(records[0]["adult_count"], 15);
    assert_eq!(records[1]["child_count"], 1);
}

#[test]
fn test_extract_missing_file_fails() {
    eod()
        .args(["extract", "no-such-dispatch.xlsx"])
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// CHECK-TEMPLATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_check_template_reports_block() {
    let dir = TempDir::new().unwrap();
    let (_, template) = write_inputs(dir.path());

    eod()
        .arg("check-template")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows 17-25"))
        .stdout(predicate::str::contains("A17"));
}

#[test]
fn test_check_template_with_wrong_layout_fails() {
    let dir = TempDir::new().unwrap();
    let (_, template) = write_inputs(dir.path());
    let layout = dir.path().join("layout.yaml");
    fs::write(&layout, "block:\n  start_row: 11\n  end_row: 14\n").unwrap();

    eod()
        .arg("check-template")
        .arg(&template)
        .env("EOD_LAYOUT", &layout)
        .assert()
        .failure()
        .stdout(predicate::str::contains("no placeholder found"));
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_generate_writes_report() {
    let dir = TempDir::new().unwrap();
    let (dispatch, template) = write_inputs(dir.path());
    let output = dir.path().join("eod.xlsx");

    eod()
        .arg("generate")
        .arg("--dispatch")
        .arg(&dispatch)
        .arg("--template")
        .arg(&template)
        .arg("--output")
        .arg(&output)
        .args(["--date", "2026-10-16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbour Walk"))
        .stdout(predicate::str::contains("rows 26-34"))
        .stdout(predicate::str::contains("Report generated"));

    assert!(output.exists());
}

#[test]
fn test_generate_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (dispatch, _) = write_inputs(dir.path());
    let template = dir.path().join("broken.xlsx");
    fs::write(&template, "not a workbook").unwrap();
    let output = dir.path().join("eod.xlsx");

    eod()
        .arg("generate")
        .arg("-d")
        .arg(&dispatch)
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure();

    assert!(!output.exists(), "no partial output on failure");
}

#[test]
fn test_generate_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let (dispatch, template) = write_inputs(dir.path());

    eod()
        .arg("generate")
        .arg("-d")
        .arg(&dispatch)
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(dir.path().join("eod.xlsx"))
        .args(["--date", "16/10/2026"])
        .assert()
        .failure();
}
