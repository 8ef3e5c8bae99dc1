//! Render and write suite release notes.

use std::io::Write as _;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::ChangelogError;
use crate::suite::{combined_changelog, SuiteCategory, SuiteConfig};

use super::combined::CombinedChangelog;

/// Everything needed to render one suite release.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteRelease {
    pub version: String,
    pub date: NaiveDate,
    pub name: String,
    pub description: String,
    pub categories: Vec<SuiteCategory>,
    pub changelog: CombinedChangelog,
}

impl SuiteRelease {
    pub fn new(
        config: &SuiteConfig,
        version: &str,
        date: NaiveDate,
        categories: Vec<SuiteCategory>,
    ) -> Self {
        let changelog = combined_changelog(&categories);

        Self {
            version: version.to_string(),
            date,
            name: config.section.name.clone(),
            description: config.section.description.clone(),
            categories,
            changelog,
        }
    }

    pub fn to_json(&self) -> Result<String, ChangelogError> {
        serde_json::to_string_pretty(self).map_err(ChangelogError::SerializeFailed)
    }
}

/// Render release notes as Markdown.
pub fn render_release(release: &SuiteRelease) -> String {
    let mut out = format!("# {}\n\n", release.name);
    out.push_str(&format!(
        "## [{}] - {}\n\n",
        release.version,
        release.date.format("%Y-%m-%d")
    ));

    if !release.description.is_empty() {
        out.push_str(&format!("{}\n\n", release.description));
    }

    out.push_str("### Components\n\n");
    for category in &release.categories {
        out.push_str(&format!("#### {}\n\n", category.name));

        for component in &category.components {
            if component.url.is_empty() {
                out.push_str(&format!("- {} @ {}\n", component.repo, component.release_name));
            } else {
                out.push_str(&format!(
                    "- [{}]({}) @ {}\n",
                    component.repo, component.url, component.release_name
                ));
            }
        }

        out.push('\n');
    }

    out.push_str(&release.changelog.to_string());

    out
}

/// Write `content` to `path`, replacing it atomically.
///
/// The text goes to a temporary file in the same directory first, so an
/// interrupted run never leaves a truncated file behind.
pub fn write_release(path: &Path, content: &str) -> Result<(), ChangelogError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(ChangelogError::WriteFailed)?;
    file.write_all(content.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;
    file.persist(path)
        .map_err(|e| ChangelogError::WriteFailed(e.error))?;

    Ok(())
}

/// Generate a summary message for the user.
pub fn generate_summary(release: &SuiteRelease) -> String {
    let components: usize = release
        .categories
        .iter()
        .map(|category| category.components.len())
        .sum();
    let changed = release
        .categories
        .iter()
        .flat_map(|category| category.components.iter())
        .filter(|component| !component.changelogs.is_empty())
        .count();

    let total = release.changelog.len();
    if total == 0 {
        return format!("No changelog entries across {} components.", components);
    }

    let details: Vec<String> = release
        .changelog
        .sections()
        .map(|(section, entries)| format!("{}: {}", section, entries.len()))
        .collect();

    let entry_word = if total == 1 { "entry" } else { "entries" };

    format!(
        "Collected {} {} ({}) from {} of {} components",
        total,
        entry_word,
        details.join(", "),
        changed,
        components
    )
}
