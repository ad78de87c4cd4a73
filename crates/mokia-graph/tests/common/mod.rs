//! Shared fixtures for mokia-graph integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `files` (relative path, content) under the temp dir and return its root.
pub fn create_test_project(temp: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = temp.path().to_path_buf();
    for (rel, content) in files {
        write_file(&root, rel, content);
    }
    root
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Entry importing two local modules, mirroring a typical mock layout.
pub fn create_entry_with_two_modules(temp: &TempDir) -> PathBuf {
    create_test_project(
        temp,
        &[
            (
                "index.toml",
                r#"
imports = ["./users", "./orders"]
port = 3000
"#,
            ),
            (
                "users.toml",
                r#"
[routes]
"GET /users" = { json = { users = [] } }
"#,
            ),
            (
                "orders.toml",
                r#"
[routes."GET /orders"]
json = []
"#,
            ),
        ],
    )
}
