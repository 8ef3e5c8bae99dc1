//! Suite descriptor loading and re-pinning.
//!
//! A suite descriptor lists the component repositories of a suite, grouped
//! into categories, with the version each one is pinned to:
//!
//! ```yaml
//! section:
//!   name: Conjur Open Source Suite
//!   description: Tools for securing secrets
//!   categories:
//!     - name: Conjur SDK
//!       repos:
//!         - name: cyberark/conjur-api-go
//!           url: https://github.com/cyberark/conjur-api-go
//!           version: v0.6.0
//!           after: v0.5.2
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// A component repository and its version pins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub description: String,
    pub url: String,
    pub certification: String,
    /// Version to include up to. Empty means the latest release.
    pub version: String,
    /// Version already covered by a previous suite release (exclusive).
    #[serde(rename = "after")]
    pub after_version: String,
    pub upgrade_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub repos: Vec<Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub name: String,
    pub description: String,
    pub categories: Vec<Category>,
}

/// Top-level suite descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub section: Section,
}

impl SuiteConfig {
    /// Read and parse a suite descriptor file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading suite descriptor");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::ParseFailed)
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.section
            .categories
            .iter()
            .flat_map(|category| category.repos.iter())
    }

    fn repositories_mut(&mut self) -> impl Iterator<Item = &mut Repository> {
        self.section
            .categories
            .iter_mut()
            .flat_map(|category| category.repos.iter_mut())
    }

    /// Re-pin every repository to cover what was released after its pinned version.
    ///
    /// The pinned version becomes the lower bound and the upper bound is
    /// cleared, so collection picks up everything up to the latest release.
    pub fn select_unreleased(&mut self) {
        for repo in self.repositories_mut() {
            repo.after_version = std::mem::take(&mut repo.version);
        }
    }

    /// Use the versions pinned in a previous suite release as lower bounds.
    ///
    /// Repositories are matched by name. Repositories absent from `previous`
    /// keep their own `after` pin.
    pub fn set_baseline_repo_versions(&mut self, previous: &SuiteConfig) {
        let baseline: HashMap<&str, &str> = previous
            .repositories()
            .map(|repo| (repo.name.as_str(), repo.version.as_str()))
            .collect();

        for repo in self.repositories_mut() {
            if let Some(version) = baseline.get(repo.name.as_str()) {
                debug!(repo = %repo.name, after = %version, "Pinning baseline version");
                repo.after_version = version.to_string();
            }
        }
    }
}
