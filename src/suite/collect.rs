//! Gather the changelogs of every suite component in its pinned range.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::changelog::{find_version, parse, CombinedChangelog, VersionChangelog};
use crate::error::CollectError;
use crate::version::{find_available, get_relevant_versions, highest_version};

use super::config::{Repository, SuiteConfig};
use super::source::ReleaseSource;

/// One component repository with the changelog records it contributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteComponent {
    pub repo: String,
    pub url: String,
    /// Version the suite ships, or the last known one when nothing changed.
    pub release_name: String,
    pub certification: String,
    pub upgrade_url: String,
    /// Records in the pinned range, ascending by version.
    pub changelogs: Vec<VersionChangelog>,
}

impl SuiteComponent {
    fn new(repo: &Repository, release_name: String, changelogs: Vec<VersionChangelog>) -> Self {
        Self {
            repo: repo.name.clone(),
            url: repo.url.clone(),
            release_name,
            certification: repo.certification.clone(),
            upgrade_url: repo.upgrade_url.clone(),
            changelogs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteCategory {
    pub name: String,
    pub description: String,
    pub components: Vec<SuiteComponent>,
}

/// Collect every component of `config`, in config order.
///
/// Repositories are processed one at a time. The first failure aborts the
/// run and names the repository it came from.
pub async fn collect_suite(
    config: &SuiteConfig,
    source: &dyn ReleaseSource,
) -> Result<Vec<SuiteCategory>, CollectError> {
    let mut categories = Vec::with_capacity(config.section.categories.len());

    for category in &config.section.categories {
        let mut components = Vec::with_capacity(category.repos.len());

        for repo in &category.repos {
            components.push(collect_component(repo, source).await?);
        }

        categories.push(SuiteCategory {
            name: category.name.clone(),
            description: category.description.clone(),
            components,
        });
    }

    Ok(categories)
}

async fn collect_component(
    repo: &Repository,
    source: &dyn ReleaseSource,
) -> Result<SuiteComponent, CollectError> {
    let source_error = |source| CollectError::Source {
        repo: repo.name.clone(),
        source,
    };

    info!(repo = %repo.name, "Retrieving changelogs");

    let available = source
        .available_versions(&repo.name)
        .await
        .map_err(source_error)?;

    let versions_error = |source| CollectError::Versions {
        repo: repo.name.clone(),
        source,
    };

    // An unpinned repository ships its latest release.
    let upper = if repo.version.is_empty() && repo.after_version.is_empty() {
        highest_version(&available).map_err(versions_error)?
    } else {
        repo.version.clone()
    };

    let relevant = get_relevant_versions(&available, &repo.after_version, &upper)
        .map_err(versions_error)?;

    let Some(highest) = relevant.last() else {
        let release_name = if repo.version.is_empty() {
            repo.after_version.clone()
        } else {
            repo.version.clone()
        };
        debug!(repo = %repo.name, release = %release_name, "No new versions");
        return Ok(SuiteComponent::new(repo, release_name, Vec::new()));
    };

    // Fetch at the tag as published, which may lack the `v` prefix.
    let git_ref = find_available(&available, highest).unwrap_or(highest.as_str());
    let document = source
        .changelog(&repo.name, git_ref)
        .await
        .map_err(source_error)?;

    let records = parse(&repo.name, &document);

    let mut changelogs = Vec::with_capacity(relevant.len());
    for version in &relevant {
        match find_version(&records, version) {
            Some(record) => changelogs.push(record.clone()),
            None => warn!(repo = %repo.name, %version, "No changelog entry for version"),
        }
    }

    debug!(
        repo = %repo.name,
        versions = relevant.len(),
        records = changelogs.len(),
        "Collected changelogs"
    );

    Ok(SuiteComponent::new(repo, highest.clone(), changelogs))
}

/// Merge the records of every component into one changelog.
pub fn combined_changelog(categories: &[SuiteCategory]) -> CombinedChangelog {
    let records: Vec<VersionChangelog> = categories
        .iter()
        .flat_map(|category| category.components.iter())
        .flat_map(|component| component.changelogs.iter().cloned())
        .collect();

    CombinedChangelog::new(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitHubError;
    use crate::suite::source::MockReleaseSource;
    use mockall::predicate::eq;

    const CHANGELOG: &str = "# Changelog

## [Unreleased]
### Added
- Not shipped yet

## [1.2.0] - 2024-03-01
### Added
- Token refresh

## [1.1.0] - 2024-02-01
### Fixed
- Crash on empty secret

## [1.0.0] - 2024-01-01
### Added
- Initial release
";

    fn suite(after: &str, version: &str) -> SuiteConfig {
        SuiteConfig::from_yaml(&format!(
            r#"
section:
  name: Suite
  categories:
    - name: SDK
      description: Client libraries
      repos:
        - name: org/api
          url: https://github.com/org/api
          after: "{after}"
          version: "{version}"
"#
        ))
        .unwrap()
    }

    fn available() -> Vec<String> {
        vec!["v1.2.0".to_string(), "v1.1.0".to_string(), "v1.0.0".to_string()]
    }

    #[tokio::test]
    async fn test_collect_filters_to_pinned_range() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .with(eq("org/api"))
            .returning(|_| Ok(available()));
        source
            .expect_changelog()
            .with(eq("org/api"), eq("v1.2.0"))
            .times(1)
            .returning(|_, _| Ok(CHANGELOG.to_string()));

        let categories = collect_suite(&suite("v1.0.0", "v1.2.0"), &source).await.unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].description, "Client libraries");

        let component = &categories[0].components[0];
        assert_eq!(component.release_name, "v1.2.0");
        assert_eq!(component.url, "https://github.com/org/api");

        let versions: Vec<&str> = component
            .changelogs
            .iter()
            .map(|record| record.version.as_str())
            .collect();
        assert_eq!(versions, vec!["1.1.0", "1.2.0"]);
    }

    #[tokio::test]
    async fn test_collect_fetches_at_published_tag_literal() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(vec!["1.2.0".to_string(), "1.1.0".to_string()]));
        source
            .expect_changelog()
            .with(eq("org/api"), eq("1.2.0"))
            .times(1)
            .returning(|_, _| Ok(CHANGELOG.to_string()));

        let categories = collect_suite(&suite("v1.1.0", ""), &source).await.unwrap();
        assert_eq!(categories[0].components[0].changelogs.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_without_new_versions() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(available()));
        source.expect_changelog().never();

        let categories = collect_suite(&suite("v1.2.0", ""), &source).await.unwrap();

        let component = &categories[0].components[0];
        assert_eq!(component.release_name, "v1.2.0");
        assert!(component.changelogs.is_empty());
    }

    #[tokio::test]
    async fn test_collect_unpinned_repo_takes_latest_release() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(available()));
        source
            .expect_changelog()
            .with(eq("org/api"), eq("v1.2.0"))
            .times(1)
            .returning(|_, _| Ok(CHANGELOG.to_string()));

        let categories = collect_suite(&suite("", ""), &source).await.unwrap();

        let component = &categories[0].components[0];
        assert_eq!(component.release_name, "v1.2.0");
        let versions: Vec<&str> = component
            .changelogs
            .iter()
            .map(|record| record.version.as_str())
            .collect();
        assert_eq!(versions, vec!["1.2.0"]);
    }

    #[tokio::test]
    async fn test_collect_unpinned_repo_without_releases() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(Vec::new()));
        source.expect_changelog().never();

        let err = collect_suite(&suite("", ""), &source).await.unwrap_err();
        assert!(matches!(
            err,
            CollectError::Versions {
                source: crate::error::VersionError::NoVersions,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_collect_version_error_names_repo() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(available()));

        let err = collect_suite(&suite("v0.9.0", "v0.9.0"), &source)
            .await
            .unwrap_err();

        assert!(matches!(err, CollectError::Versions { ref repo, .. } if repo == "org/api"));
        assert!(err.to_string().starts_with("org/api: v0.9.0 is not in available versions"));
    }

    #[tokio::test]
    async fn test_collect_source_error_names_repo() {
        let mut source = MockReleaseSource::new();
        source.expect_available_versions().returning(|_| {
            Err(GitHubError::NotFound {
                owner: "org".to_string(),
                repo: "api".to_string(),
            })
        });

        let err = collect_suite(&suite("", ""), &source).await.unwrap_err();
        assert!(matches!(err, CollectError::Source { ref repo, .. } if repo == "org/api"));
    }

    #[tokio::test]
    async fn test_combined_changelog_tags_entries() {
        let mut source = MockReleaseSource::new();
        source
            .expect_available_versions()
            .returning(|_| Ok(available()));
        source
            .expect_changelog()
            .returning(|_, _| Ok(CHANGELOG.to_string()));

        let categories = collect_suite(&suite("v1.0.0", ""), &source).await.unwrap();
        let combined = combined_changelog(&categories);

        let added: Vec<String> = combined
            .get("Added")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(added, vec!["`org/api@1.2.0`: Token refresh"]);
        assert_eq!(combined.get("Fixed").unwrap().len(), 1);
    }
}
