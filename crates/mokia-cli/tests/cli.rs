//! Tests of the `mokia` binary.

mod common;

use assert_cmd::Command;
use common::write_file;
use predicates::prelude::*;
use tempfile::TempDir;

fn mokia() -> Command {
    let mut cmd = Command::cargo_bin("mokia").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_options() {
    mokia()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--priority"))
        .stdout(predicate::str::contains("--debounce"));
}

#[test]
fn test_missing_entry_fails_without_watch() {
    let temp = TempDir::new().unwrap();

    mokia()
        .current_dir(temp.path())
        .arg("missing.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_module_fails_without_watch() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "index.toml", "colour = \"red\"");

    mokia()
        .current_dir(temp.path())
        .args(["--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_unsupported_entry_extension() {
    let temp = TempDir::new().unwrap();

    mokia()
        .current_dir(temp.path())
        .arg("mock.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains(".toml or .json"));
}

#[test]
fn test_bad_priority_is_a_usage_error() {
    mokia()
        .args(["--priority", "FETCH /x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FETCH"));
}
