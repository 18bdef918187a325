//! Integration tests for the quote-queue CLI
//!
//! These run the compiled binary against a throwaway config and database.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a store-only config and return its path
fn write_config(dir: &TempDir) -> String {
    let db_path = dir.path().join("quotes.db");
    let config_path = dir.path().join("config.toml");

    let config = format!(
        "[store]\npath = \"{}\"\n",
        db_path.to_str().unwrap().replace('\\', "/")
    );
    std::fs::write(&config_path, config).unwrap();

    config_path.to_str().unwrap().to_string()
}

fn quote_queue(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("quote-queue").unwrap();
    cmd.env("QUOTECAST_CONFIG", config_path);
    cmd
}

#[test]
fn test_stats_on_empty_store() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total quotes: 0"))
        .stdout(predicate::str::contains("Unused:       0"));
}

#[test]
fn test_add_then_stats() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["add", "Be yourself.", "--author", "Anon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Be yourself. - Anon"));

    quote_queue(&config)
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total quotes: 1"))
        .stdout(predicate::str::contains("Unused:       1"));
}

#[test]
fn test_duplicate_add_is_silent_noop() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["add", "Be yourself.", "--author", "Anon"])
        .assert()
        .success();

    // Same text again: no error, exit 0, nothing added.
    quote_queue(&config)
        .args(["add", "Be yourself.", "--author", "Someone Else"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already stored"));

    quote_queue(&config)
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total quotes: 1"));
}

#[test]
fn test_add_empty_text_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["add", "   "])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Quote text cannot be empty"));
}

#[test]
fn test_list_json_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["add", "Stay hungry.", "--author", "Stewart Brand"])
        .assert()
        .success();

    quote_queue(&config)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"Stay hungry.\""))
        .stdout(predicate::str::contains("\"used\": false"));
}

#[test]
fn test_list_unknown_format_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["list", "--format", "yaml"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_stats_json_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    quote_queue(&config)
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 0"));
}
