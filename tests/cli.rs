//! End-to-end CLI tests

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn datarecon() -> Command {
    Command::cargo_bin("datarecon").unwrap()
}

#[test]
fn test_identical_files_exit_clean() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,name,age\n1,Alice,25\n2,Bob,30\n");
    let tgt = write_file(&dir, "tgt.csv", "id,name,age\n1,Alice,25\n2,Bob,30\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No findings."));
}

#[test]
fn test_cell_diff_sets_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,name,age\n1,Alice,25\n2,Bob,30\n");
    let tgt = write_file(&dir, "tgt.csv", "id,name,age\n1,Alice,25\n2,Bob,31\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age: 30 → 31"));
}

#[test]
fn test_missing_key_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,name\n1,Alice\n");
    let tgt = write_file(&dir, "tgt.csv", "id,name\n1,Alice\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "ghost_col"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ghost_col"));
}

#[test]
fn test_unreadable_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let tgt = write_file(&dir, "tgt.csv", "id\n1\n");

    datarecon()
        .arg(dir.path().join("nope.csv"))
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to open file"));
}

#[test]
fn test_ignored_column_suppresses_findings() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(
        &dir,
        "src.csv",
        "id,amount,updated_at\n1,10,2025-01-01\n",
    );
    let tgt = write_file(
        &dir,
        "tgt.csv",
        "id,amount,updated_at\n1,10,2025-06-30\n",
    );

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--ignore-column", "updated_at"])
        .assert()
        .success();
}

#[test]
fn test_duplicate_keys_reported() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,name\n1,Alice\n1,Alyce\n2,Bob\n");
    let tgt = write_file(&dir, "tgt.csv", "id,name\n1,Alice\n2,Bob\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("duplicate-in-source"));
}

#[test]
fn test_json_report_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,age\n1,25\n");
    let tgt = write_file(&dir, "tgt.csv", "id,age\n1,26\n");

    let output = datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--format", "json", "--name", "audit"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["summary"][0]["test"], "audit");
    assert_eq!(doc["summary"][0]["diff_count"], 1);
    assert_eq!(doc["tests"][0]["diffs"][0]["changes"][0]["column"], "age");
}

#[test]
fn test_html_report() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id\n1\n");
    let tgt = write_file(&dir, "tgt.csv", "id\n1\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_rename_aligns_headers() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "Customer ID,Name\n1,Alice\n");
    let tgt = write_file(&dir, "tgt.csv", "id,name\n1,Alice\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--rename", "customer_id=id"])
        .assert()
        .success();
}

#[test]
fn test_numeric_rule_reconciles_currency() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id,price\n1,\"$2,000\"\n");
    let tgt = write_file(&dir, "tgt.csv", "id,price\n1,2000\n");

    // without the rule the sides disagree on type and text
    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .code(1);

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--rule", "price=numeric"])
        .assert()
        .success();
}

#[test]
fn test_unknown_rule_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.csv", "id\n1\n");
    let tgt = write_file(&dir, "tgt.csv", "id\n1\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id", "--rule", "id=fuzzy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule"));
}

#[test]
fn test_unsupported_extension_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(&dir, "src.parquet", "not parquet");
    let tgt = write_file(&dir, "tgt.csv", "id\n1\n");

    datarecon()
        .arg(&src)
        .arg(&tgt)
        .args(["--key", "id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported input format"));
}
