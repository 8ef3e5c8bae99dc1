//! Merge per-repository changelogs into one section-keyed changelog.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::VersionChangelog;

/// A changelog entry tagged with the repository and version it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEntry {
    pub repo: String,
    pub version: String,
    pub text: String,
}

impl fmt::Display for TaggedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}@{}`: {}", self.repo, self.version, self.text)
    }
}

/// Canonical section name to the tagged entries of every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinedChangelog {
    sections: BTreeMap<String, Vec<TaggedEntry>>,
}

impl CombinedChangelog {
    /// Combine records, ordered by repository name.
    ///
    /// Section names are normalized to title case so `ADDED`, `added` and
    /// `Added` land in the same bucket. The fallback section is skipped.
    pub fn new(records: &[VersionChangelog]) -> Self {
        let mut ordered: Vec<&VersionChangelog> = records.iter().collect();
        ordered.sort_by(|a, b| a.repo.cmp(&b.repo));

        let mut sections: BTreeMap<String, Vec<TaggedEntry>> = BTreeMap::new();

        for record in ordered {
            for (section, entries) in record.named_sections() {
                let bucket = sections.entry(normalize_section(section)).or_default();

                bucket.extend(entries.iter().map(|text| TaggedEntry {
                    repo: record.repo.clone(),
                    version: record.version.clone(),
                    text: text.clone(),
                }));
            }
        }

        Self { sections }
    }

    pub fn get(&self, section: &str) -> Option<&[TaggedEntry]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// Sections in sorted order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[TaggedEntry])> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

impl fmt::Display for CombinedChangelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (section, entries) in &self.sections {
            writeln!(f, "### {}", section)?;
            for entry in entries {
                writeln!(f, "- {}", entry)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Title-case each word: `"security FIXES"` -> `"Security Fixes"`.
pub fn normalize_section(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
