//! Shared test helpers for storage module tests.

use std::path::Path;

use tempfile::TempDir;

use crate::config::MalformedLinePolicy;
use crate::storage::RecordStore;

/// Creates a store backed by `user_data.log` in a fresh temporary directory.
/// Keep the `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, RecordStore) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let store = RecordStore::new(dir.path().join("user_data.log"), MalformedLinePolicy::Drop);
    (dir, store)
}

/// Reads the log as a list of lines without terminators.
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read record log")
        .lines()
        .map(str::to_string)
        .collect()
}
