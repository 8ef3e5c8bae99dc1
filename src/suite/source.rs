//! Where component versions and changelogs come from.

use async_trait::async_trait;

use crate::error::GitHubError;

/// A provider of published component versions and their changelog documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Published, non-draft version literals of `repo`, e.g. `v1.2.3`.
    async fn available_versions(&self, repo: &str) -> Result<Vec<String>, GitHubError>;

    /// Raw `CHANGELOG.md` of `repo` at `git_ref`.
    async fn changelog(&self, repo: &str, git_ref: &str) -> Result<String, GitHubError>;
}
