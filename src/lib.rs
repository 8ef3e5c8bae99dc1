//! suitelog - Combined release notes for a suite of independently versioned repositories.
//!
//! # Overview
//!
//! suitelog reads a suite descriptor listing component repositories and the
//! versions they are pinned to, fetches each component's CHANGELOG.md from
//! GitHub, keeps the versions released inside each pinned range, and merges
//! them into one changelog grouped by section.

pub mod changelog;
pub mod error;
pub mod github;
pub mod suite;
pub mod version;

// Re-export commonly used types
pub use changelog::{CombinedChangelog, SuiteRelease, TaggedEntry, VersionChangelog};
pub use error::{ChangelogError, CollectError, ConfigError, GitHubError, ReleaseError, VersionError};
pub use github::GitHubSource;
pub use suite::{ReleaseSource, SuiteCategory, SuiteComponent, SuiteConfig};
