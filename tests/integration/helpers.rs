//! Shared fixtures for integration tests

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tsr::Document;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_fixture(name: &str) -> Document {
    Document::parse(fixture(name)).unwrap()
}

/// Write `content` to `name` inside a fresh temp directory.
///
/// Keep the returned `TempDir` alive for as long as the file is used.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}
