//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;

use app_config::RawEnvironment;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

/// Build a raw environment from literal pairs.
pub fn env(pairs: &[(&str, &str)]) -> RawEnvironment {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

/// A fixed timestamp so resolved configurations compare equal.
pub fn build_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap()
}

/// An empty project directory.
pub fn empty_project() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A project directory with a `package.json`.
#[allow(dead_code)]
pub fn project_with_package() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{
  "name": "storefront",
  "version": "2.1.0",
  "dependencies": { "vue": "^3.4.21", "pinia": "^2.1.7", "vue-router": "^4.3.0" },
  "devDependencies": { "vite": "^5.2.0" }
}"#,
    );
    dir
}

/// Write a file relative to `root`.
pub fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}
