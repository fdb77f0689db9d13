//! End-to-end tests for the `billscan` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated config directory.
fn billscan(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("billscan").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write_tokens(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

#[test]
fn parse_json_tokens_to_json() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(
        &dir,
        "tokens.json",
        r#"["01/02/2023", "123456789-1", "ABC XYZ-1abc", "5", "10.50"]"#,
    );

    let output = billscan(dir.path())
        .args(["parse", &input])
        .output()
        .unwrap();
    assert!(output.status.success());

    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["Bill_Date"], "01/02/2023");
    assert_eq!(items[0]["Bill_No"], "123456789-1");
    assert_eq!(items[0]["Bill_Product"], "ABC XYZ-1abc");
    assert_eq!(items[0]["Bill_Quantity"], 5);
    assert_eq!(items[0]["Unit_Price"].as_f64(), Some(10.5));
}

#[test]
fn parse_lines_to_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(
        &dir,
        "tokens.txt",
        "10/10/2023\n987654321-2\nAAA BBB-1x\n2\n1.00\nCCC DDD-2y\n3\n2.00\n",
    );

    billscan(dir.path())
        .args(["parse", &input, "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bill_Date,Bill_No,Bill_Product,Bill_Quantity,Unit_Price",
        ))
        .stdout(predicate::str::contains("10/10/2023,987654321-2,AAA BBB-1x,2,1.00"))
        .stdout(predicate::str::contains("10/10/2023,987654321-2,CCC DDD-2y,3,2.00"));
}

#[test]
fn parse_from_stdin() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args(["parse", "-", "--format", "csv"])
        .write_stdin("ABC XYZ-1abc\nno numbers here\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(",,ABC XYZ-1abc,0,"));
}

#[test]
fn parse_empty_stream() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(&dir, "tokens.json", "[]");

    billscan(dir.path())
        .args(["parse", &input])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn parse_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args(["parse", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn parse_writes_table_then_check_probes_it() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(&dir, "tokens.txt", "AAA BBB-1x\n2\n1.00\n");
    let db = dir.path().join("bills.sqlite").display().to_string();

    billscan(dir.path())
        .args(["parse", &input, "--database", &db, "--table", "invoice_items"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 1 rows"));

    billscan(dir.path())
        .args(["check", "--database", &db, "--table", "invoice_items", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("holds line items"))
        .stdout(predicate::str::contains("AAA BBB-1x"));
}

#[test]
fn check_missing_table_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(&dir, "tokens.txt", "AAA BBB-1x\n");
    let db = dir.path().join("bills.sqlite").display().to_string();

    billscan(dir.path())
        .args(["parse", &input, "--database", &db, "--table", "bills"])
        .assert()
        .success();

    billscan(dir.path())
        .args(["check", "--database", &db, "--table", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to reach table 'other'"));
}

#[test]
fn table_without_database_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(&dir, "tokens.txt", "AAA BBB-1x\n");

    billscan(dir.path())
        .args(["parse", &input, "--table", "bills"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("without --database"));
}

#[test]
fn config_set_changes_price_window() {
    let dir = TempDir::new().unwrap();
    let input = write_tokens(&dir, "tokens.txt", "ABC XYZ-1abc\na\nb\nc\n4.00\n");

    billscan(dir.path())
        .args(["parse", &input, "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(",,ABC XYZ-1abc,0,\n"));

    billscan(dir.path())
        .args(["config", "set", "extraction.price_window", "4"])
        .assert()
        .success();

    billscan(dir.path())
        .args(["parse", &input, "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(",,ABC XYZ-1abc,0,4.00"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args(["config", "set", "extraction.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn process_without_models_fails() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("invoice.jpeg");
    fs::write(&image, b"").unwrap();
    let models = dir.path().join("models");

    billscan(dir.path())
        .args([
            "process",
            &image.display().to_string(),
            "--model-dir",
            &models.display().to_string(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR models not found"));
}
