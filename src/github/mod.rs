//! GitHub API operations using octocrab.

pub mod auth;
pub mod releases;

pub use auth::github_token;
pub use releases::{parse_repo_id, GitHubSource, CHANGELOG_PATH};
