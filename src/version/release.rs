//! Pick the latest suite release descriptor from a directory.
//!
//! Descriptors are named `suite_X.Y.Z[+metadata].yml`. Build metadata such as
//! `+suite.2` marks a re-release of the same suite version; the number in it
//! is the suite iteration.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::ReleaseError;

use super::range::compare_precedence;

/// Prefix every release descriptor filename starts with.
pub const RELEASES_PREFIX: &str = "suite_";

/// Numeric suffix of the build metadata, e.g. `suite.72` -> 72. Defaults to 1.
pub fn suite_iteration(version: &Version) -> u64 {
    let digits: String = version
        .build
        .as_str()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().unwrap_or(1)
}

/// Return the path of the release descriptor with the highest version in `dir`.
///
/// Files without [`RELEASES_PREFIX`] are skipped. A prefixed file whose name
/// does not hold a valid semver is an error.
pub fn latest_release_in_dir(dir: &Path) -> Result<PathBuf, ReleaseError> {
    let read_dir_error = |source| ReleaseError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut filenames = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        filenames.push(entry.file_name().to_string_lossy().into_owned());
    }

    if filenames.is_empty() {
        return Err(ReleaseError::EmptyDirectory(dir.to_path_buf()));
    }

    // read_dir order is platform dependent
    filenames.sort();

    let mut latest: Option<(String, Version)> = None;

    for filename in filenames {
        let Some(version_text) = release_version_text(&filename) else {
            debug!(file = %filename, "Skipping non-release file");
            continue;
        };

        let bare = version_text.strip_prefix('v').unwrap_or(version_text);
        let version = Version::parse(bare).map_err(|source| ReleaseError::InvalidReleaseFile {
            file: filename.clone(),
            dir: dir.to_path_buf(),
            source,
        })?;

        let is_newer = match &latest {
            None => true,
            Some((_, current)) => match compare_precedence(current, &version) {
                Ordering::Less => true,
                Ordering::Equal => suite_iteration(current) < suite_iteration(&version),
                Ordering::Greater => false,
            },
        };

        if is_newer {
            latest = Some((filename, version));
        }
    }

    match latest {
        Some((filename, version)) => {
            debug!(file = %filename, %version, "Selected latest release");
            Ok(dir.join(filename))
        }
        None => Err(ReleaseError::NoReleaseFiles {
            prefix: RELEASES_PREFIX,
            dir: dir.to_path_buf(),
        }),
    }
}

/// `suite_1.2.3+suite.1.yml` -> `1.2.3+suite.1`.
fn release_version_text(filename: &str) -> Option<&str> {
    let rest = filename.strip_prefix(RELEASES_PREFIX)?;
    Some(rest.rsplit_once('.').map_or(rest, |(stem, _)| stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    #[test]
    fn test_suite_iteration() {
        assert_eq!(suite_iteration(&version("1.1.0+suite.1")), 1);
        assert_eq!(suite_iteration(&version("1.1.0+suite")), 1);
        assert_eq!(suite_iteration(&version("1.1.0")), 1);
        assert_eq!(suite_iteration(&version("1.1.0+suite.7")), 7);
        assert_eq!(suite_iteration(&version("1.1.0+suite.72")), 72);
    }

    #[test]
    fn test_release_version_text() {
        assert_eq!(release_version_text("suite_1.2.3.yml"), Some("1.2.3"));
        assert_eq!(
            release_version_text("suite_11.5.12+suite.2.yml"),
            Some("11.5.12+suite.2")
        );
        assert_eq!(release_version_text("README.md"), None);
    }

    #[test]
    fn test_latest_release_in_dir_prefers_higher_iteration() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for name in [
            "suite_11.5.12+suite.1.yml",
            "suite_11.5.12+suite.2.yml",
            "suite_11.5.2.yml",
            "suite_1.20.0.yml",
        ] {
            fs::write(dir.path().join(name), "section: {}\n").unwrap();
        }

        let latest = latest_release_in_dir(dir.path()).unwrap();
        assert_eq!(latest, dir.path().join("suite_11.5.12+suite.2.yml"));
    }

    #[test]
    fn test_latest_release_in_dir_bad_semver() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("suite_3.4.yml"), "").unwrap();

        let err = latest_release_in_dir(dir.path()).unwrap_err();
        match err {
            ReleaseError::InvalidReleaseFile { file, .. } => assert_eq!(file, "suite_3.4.yml"),
            other => panic!("Expected InvalidReleaseFile, got {other:?}"),
        }
    }
}
