//! Command-line smoke tests.
//!
//! These run the compiled binary against small workbook fixtures and
//! check each output format end to end.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;

fn write_fixture(path: &Path) {
    let rows: &[&[&str]] = &[
        &["Merk", "BioX"],
        &["Sel", "Ref", "D", "C", "IAT", "GEL"],
        &["1", "R1", "+", "-", "+", "-"],
        &["2", "R2", "0", "+", "2+", "+"],
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("antigram-panel")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_extract_missing_file_fails() {
    Command::cargo_bin("antigram-panel")
        .unwrap()
        .args(["extract", "/no/such/antigram.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source file not found"));
}

#[test]
fn test_extract_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("antigram.xlsx");
    write_fixture(&path);

    let output = Command::cargo_bin("antigram-panel")
        .unwrap()
        .arg("extract")
        .arg(&path)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let panel: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(panel["ok"], serde_json::json!(true));
    assert_eq!(panel["meta"]["brand"], "BioX");
    assert_eq!(panel["cells"][0]["ref"], "R1");
    assert_eq!(panel["cells"][0]["antigen"]["D"], "+");
    assert_eq!(panel["auto"]["iat"], "");
}

#[test]
fn test_extract_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("antigram.xlsx");
    write_fixture(&path);

    Command::cargo_bin("antigram-panel")
        .unwrap()
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Brand:  BioX"))
        .stdout(predicate::str::contains("No auto control row found."));
}

#[test]
fn test_extract_tsv_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("antigram.xlsx");
    write_fixture(&path);

    Command::cargo_bin("antigram-panel")
        .unwrap()
        .arg("extract")
        .arg(&path)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sel\tref\tD\tC\n"))
        .stdout(predicate::str::contains("1\tR1\t+\t-"));
}

#[test]
fn test_inspect_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("antigram.xlsx");
    write_fixture(&path);

    Command::cargo_bin("antigram-panel")
        .unwrap()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Header:   sheet row 2"))
        .stdout(predicate::str::contains("Antigen columns"))
        .stdout(predicate::str::contains("sheet column 3"));
}
