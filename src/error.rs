//! Error types for suitelog modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from semantic version resolution.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),

    #[error("cannot ascertain highest version - no versions provided")]
    NoVersions,

    #[error("v{version} is not in available versions ([{}])", .available.join(" "))]
    NotAvailable {
        version: semver::Version,
        available: Vec<String>,
    },
}

/// Errors from selecting the latest suite release descriptor.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("could not read releases directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not find any release files in '{}'", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("could not parse semver from '{file}' in {} ({source})", .dir.display())]
    InvalidReleaseFile {
        file: String,
        dir: PathBuf,
        #[source]
        source: semver::Error,
    },

    #[error("unable to find release file starting with '{prefix}' in '{}'", .dir.display())]
    NoReleaseFiles { prefix: &'static str, dir: PathBuf },
}

/// Errors from loading suite descriptors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error reading suite file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing suite file: {0}")]
    ParseFailed(#[source] serde_yaml::Error),
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("GitHub request failed: {0}")]
    RequestFailed(#[source] Box<octocrab::Error>),

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Not found on GitHub: {owner}/{repo}")]
    NotFound { owner: String, repo: String },

    #[error("Invalid GitHub repository id: {0}")]
    InvalidRepository(String),

    #[error("{path} at {git_ref} in {repo} has no decodable content")]
    EmptyContent {
        repo: String,
        path: String,
        git_ref: String,
    },
}

/// Errors from collecting component changelogs for a suite.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("{repo}: {source}")]
    Versions {
        repo: String,
        #[source]
        source: VersionError,
    },

    #[error("{repo}: {source}")]
    Source {
        repo: String,
        #[source]
        source: GitHubError,
    },
}

/// Errors from writing suite release notes.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to write release notes: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to serialize release notes: {0}")]
    SerializeFailed(#[source] serde_json::Error),
}
