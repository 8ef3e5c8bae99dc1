//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a changelog fixture.
pub fn changelog_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("changelogs").join(name)
}

/// Get the path to a suite descriptor fixture.
pub fn suite_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("suites").join(name)
}

/// Read a fixture file as a string.
pub fn read_fixture(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a releases directory holding an empty file for each name.
pub fn releases_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = temp_test_dir();
    for name in names {
        touch(dir.path(), name);
    }
    dir
}

pub fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), "section: {}\n")
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", name, e));
}

/// Build a changelog with `versions` headings, each holding `sections`
/// subsections of `bullets` entries.
pub fn synthetic_changelog(versions: usize, sections: usize, bullets: usize) -> String {
    let mut doc = String::from("# Changelog\n\n## [Unreleased]\n### Added\n- Pending\n\n");

    for v in (0..versions).rev() {
        doc.push_str(&format!("## [1.{}.0] - 2024-01-{:02}\n", v, v + 1));
        for s in 0..sections {
            doc.push_str(&format!("### Section{}\n", s));
            for b in 0..bullets {
                doc.push_str(&format!("- Change {} {} {}\n", v, s, b));
            }
        }
        doc.push('\n');
    }

    doc
}
