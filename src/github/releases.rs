//! Component releases and changelogs from GitHub via octocrab.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitHubError;
use crate::suite::ReleaseSource;
use crate::version::parse_version;

/// File fetched from each component repository.
pub const CHANGELOG_PATH: &str = "CHANGELOG.md";

const PER_PAGE: u8 = 100;

/// Safety limit to prevent infinite pagination loops.
const MAX_PAGES: u32 = 50;

/// The subset of a GitHub release we need.
#[derive(Debug, Clone, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
    #[serde(default)]
    draft: bool,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// [`ReleaseSource`] backed by the GitHub REST API.
pub struct GitHubSource {
    octocrab: Octocrab,
}

impl GitHubSource {
    /// Build a client, authenticated when a token is given.
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        let builder = match token {
            Some(token) => Octocrab::builder().personal_token(token),
            None => Octocrab::builder(),
        };

        let octocrab = builder
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(octocrab))
    }

    /// Use a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<ReleaseInfo>, GitHubError> {
        let route = format!("/repos/{}/{}/releases", owner, repo);
        let mut releases = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };

            let items: Vec<ReleaseInfo> = self
                .octocrab
                .get(&route, Some(&params))
                .await
                .map_err(|e| classify_error(e, owner, repo))?;

            let count = items.len();
            releases.extend(items);

            if count < usize::from(PER_PAGE) {
                break;
            }

            page += 1;

            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while listing releases for {}/{}",
                    MAX_PAGES, owner, repo
                );
                break;
            }
        }

        Ok(releases)
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    async fn available_versions(&self, repo: &str) -> Result<Vec<String>, GitHubError> {
        let (owner, name) = parse_repo_id(repo)?;
        let releases = self.list_releases(&owner, &name).await?;

        let mut versions = Vec::with_capacity(releases.len());
        for release in releases {
            if release.draft {
                debug!(repo, tag = %release.tag_name, "Skipping draft release");
                continue;
            }

            if parse_version(&release.tag_name).is_err() {
                warn!(repo, tag = %release.tag_name, "Skipping release with non-semver tag");
                continue;
            }

            versions.push(release.tag_name);
        }

        debug!(repo, count = versions.len(), "Listed available versions");
        Ok(versions)
    }

    async fn changelog(&self, repo: &str, git_ref: &str) -> Result<String, GitHubError> {
        let (owner, name) = parse_repo_id(repo)?;

        debug!(repo, git_ref, "Fetching {}", CHANGELOG_PATH);

        let contents = self
            .octocrab
            .repos(&owner, &name)
            .get_content()
            .path(CHANGELOG_PATH)
            .r#ref(git_ref)
            .send()
            .await
            .map_err(|e| classify_error(e, &owner, &name))?;

        contents
            .items
            .into_iter()
            .next()
            .and_then(|item| item.decoded_content())
            .ok_or_else(|| GitHubError::EmptyContent {
                repo: repo.to_string(),
                path: CHANGELOG_PATH.to_string(),
                git_ref: git_ref.to_string(),
            })
    }
}

/// Map an octocrab failure onto the dedicated error variants where possible.
fn classify_error(e: octocrab::Error, owner: &str, repo: &str) -> GitHubError {
    // Check error content using both Display and Debug output
    // to handle different octocrab error formats
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }

    if err_display.contains("Not Found") || err_debug.contains("Not Found") {
        return GitHubError::NotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
    }

    GitHubError::RequestFailed(Box::new(e))
}

/// Split a repository id into owner and name.
///
/// Accepts `owner/repo`, `https://github.com/owner/repo[.git]` and
/// `git@github.com:owner/repo.git`.
pub fn parse_repo_id(id: &str) -> Result<(String, String), GitHubError> {
    let invalid = || GitHubError::InvalidRepository(id.to_string());

    let path = if let Some(path) = id.strip_prefix("git@github.com:") {
        path
    } else if id.contains("github.com/") {
        id.split("github.com/").nth(1).ok_or_else(invalid)?
    } else {
        id
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo, ..] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_id_short_form() {
        let (owner, repo) = parse_repo_id("cyberark/conjur-api-go").unwrap();
        assert_eq!(owner, "cyberark");
        assert_eq!(repo, "conjur-api-go");
    }

    #[test]
    fn test_parse_repo_id_https() {
        let (owner, repo) = parse_repo_id("https://github.com/owner/repo.git").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");

        let (owner, repo) = parse_repo_id("https://github.com/owner/repo/").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_repo_id_ssh() {
        let (owner, repo) = parse_repo_id("git@github.com:owner/repo.git").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_repo_id_invalid() {
        assert!(matches!(
            parse_repo_id("just-a-name"),
            Err(GitHubError::InvalidRepository(_))
        ));
        assert!(parse_repo_id("/repo").is_err());
        assert!(parse_repo_id("").is_err());
    }
}
