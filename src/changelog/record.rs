//! Per-version changelog records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Section key that collects every list item of a version, whatever its subsection.
pub const FALLBACK_SECTION: &str = "_";

/// Everything a changelog says about one version of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChangelog {
    pub repo: String,
    /// Bare semver, without a `v` prefix.
    pub version: String,
    pub title: String,
    /// Date text as found in the heading. Not validated.
    pub date: String,
    pub body: String,
    /// Section name (first-seen casing) to its entries, plus [`FALLBACK_SECTION`].
    pub sections: BTreeMap<String, Vec<String>>,
}

impl VersionChangelog {
    /// Start an empty record for `repo` with the fallback section in place.
    pub fn new(repo: &str) -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(FALLBACK_SECTION.to_string(), Vec::new());

        Self {
            repo: repo.to_string(),
            version: String::new(),
            title: String::new(),
            date: String::new(),
            body: String::new(),
            sections,
        }
    }

    /// A record is worth keeping once it has both a title and a version.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.version.is_empty()
    }

    /// All list items in document order.
    pub fn entries(&self) -> &[String] {
        self.sections
            .get(FALLBACK_SECTION)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Named sections, skipping the fallback bucket.
    pub fn named_sections(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.sections
            .iter()
            .filter(|(name, _)| name.as_str() != FALLBACK_SECTION)
    }
}

/// Find the record for `version`, which may carry a `v` prefix.
pub fn find_version<'a>(
    records: &'a [VersionChangelog],
    version: &str,
) -> Option<&'a VersionChangelog> {
    let bare = version.strip_prefix('v').unwrap_or(version);
    records.iter().find(|record| record.version == bare)
}
