//! Line-oriented parser for keep-a-changelog documents.
//!
//! The document is scanned once, top to bottom. Each line is classified into a
//! [`LineKind`] and fed to a small state machine whose states track whether a
//! version block is open and where its list items are routed.

use regex_lite::Regex;
use tracing::debug;

use super::record::{FALLBACK_SECTION, VersionChangelog};

/// Reference-style link definitions, e.g. `[1.2.0]: https://...`.
const LINK_LABEL_PATTERN: &str = r"^\[[^\[\]]*\]\s*:";

/// Level 1 or 2 heading that is not a deeper heading.
const VERSION_HEADING_PATTERN: &str = r"^##?\s?[^#]";

/// Level 3 heading, exactly one level below version headings.
const SUBSECTION_HEADING_PATTERN: &str = r"^###(?:[^#]|$)";

/// Semver-shaped token, optionally wrapped in brackets and prefixed with `v`.
/// e.g. `[1.2.3]`, `2.2.3-pre.1`, `2.0.0-x.7.z.92`, `v1.3.0`.
const SEMVER_PATTERN: &str = r"\[?v?([\w.-]+\.[\w.-]+[a-zA-Z0-9])\]?";

/// Last space-separated date in the line.
/// YYYY-MM-DD (or DD.MM.YYYY, D/M/YY, etc.)
const DATE_PATTERN: &str = r".*[ ](\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}).*";

/// Classification of a single changelog line, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    LinkLabel,
    VersionHeading,
    SubsectionHeading,
    ListItem,
    Blank,
    Text,
}

/// A version record being filled in, plus the subsection list items go to.
#[derive(Debug)]
struct PendingVersion {
    record: VersionChangelog,
    /// Most recently *created* subsection. Re-entering an existing one keeps this unchanged.
    active_section: Option<String>,
}

#[derive(Debug)]
enum ParserState {
    /// No version heading seen yet. Everything is dropped.
    OutsideVersion,
    /// Inside a version block with no active subsection.
    InVersion(PendingVersion),
    /// Inside a version block with an active subsection.
    InSection(PendingVersion),
    /// Just consumed a list item.
    InListItem(PendingVersion),
}

impl ParserState {
    fn into_pending(self) -> Option<PendingVersion> {
        match self {
            Self::OutsideVersion => None,
            Self::InVersion(pending) | Self::InSection(pending) | Self::InListItem(pending) => {
                Some(pending)
            }
        }
    }

    fn settle(pending: PendingVersion) -> Self {
        if pending.active_section.is_some() {
            Self::InSection(pending)
        } else {
            Self::InVersion(pending)
        }
    }
}

/// Changelog parser with its patterns compiled once.
#[derive(Debug, Clone)]
pub struct ChangelogParser {
    link_label: Regex,
    version_heading: Regex,
    subsection_heading: Regex,
    semver: Regex,
    date: Regex,
}

impl Default for ChangelogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogParser {
    pub fn new() -> Self {
        Self {
            link_label: Regex::new(LINK_LABEL_PATTERN).expect("Invalid regex"),
            version_heading: Regex::new(VERSION_HEADING_PATTERN).expect("Invalid regex"),
            subsection_heading: Regex::new(SUBSECTION_HEADING_PATTERN).expect("Invalid regex"),
            semver: Regex::new(SEMVER_PATTERN).expect("Invalid regex"),
            date: Regex::new(DATE_PATTERN).expect("Invalid regex"),
        }
    }

    /// Classify a line. Earlier kinds win when several would match.
    pub fn classify(&self, line: &str) -> LineKind {
        if self.link_label.is_match(line) {
            LineKind::LinkLabel
        } else if self.version_heading.is_match(line) {
            LineKind::VersionHeading
        } else if self.subsection_heading.is_match(line) {
            LineKind::SubsectionHeading
        } else if line.starts_with(['*', '-']) {
            LineKind::ListItem
        } else if line.trim().is_empty() {
            LineKind::Blank
        } else {
            LineKind::Text
        }
    }

    /// Parse `document` into one record per well-formed version block.
    ///
    /// Never fails: blocks whose heading has no title or no version are
    /// discarded along with everything under them.
    pub fn parse(&self, repo: &str, document: &str) -> Vec<VersionChangelog> {
        let mut records = Vec::new();
        let mut state = ParserState::OutsideVersion;

        for line in document.lines() {
            state = self.step(state, repo, line, &mut records);
        }

        if let Some(pending) = state.into_pending() {
            flush(pending.record, &mut records);
        }

        debug!(repo, versions = records.len(), "Parsed changelog");
        records
    }

    fn step(
        &self,
        state: ParserState,
        repo: &str,
        line: &str,
        records: &mut Vec<VersionChangelog>,
    ) -> ParserState {
        match self.classify(line) {
            LineKind::LinkLabel | LineKind::Blank => state,
            LineKind::VersionHeading => {
                if let Some(pending) = state.into_pending() {
                    flush(pending.record, records);
                }

                ParserState::InVersion(PendingVersion {
                    record: self.open_version(repo, line),
                    active_section: None,
                })
            }
            LineKind::SubsectionHeading => {
                let Some(mut pending) = state.into_pending() else {
                    return ParserState::OutsideVersion;
                };

                let name = strip_heading_marker(line);
                if !pending.record.sections.contains_key(name) {
                    pending.record.sections.insert(name.to_string(), Vec::new());
                    pending.active_section = (!name.is_empty()).then(|| name.to_string());
                }

                ParserState::settle(pending)
            }
            LineKind::ListItem => {
                let Some(mut pending) = state.into_pending() else {
                    return ParserState::OutsideVersion;
                };

                // Markers are single ASCII bytes.
                let text = line[1..].trim().to_string();
                if let Some(section) = &pending.active_section {
                    pending
                        .record
                        .sections
                        .entry(section.clone())
                        .or_default()
                        .push(text.clone());
                }
                pending
                    .record
                    .sections
                    .entry(FALLBACK_SECTION.to_string())
                    .or_default()
                    .push(text);

                ParserState::InListItem(pending)
            }
            LineKind::Text => {
                let Some(mut pending) = state.into_pending() else {
                    return ParserState::OutsideVersion;
                };

                let body = &mut pending.record.body;
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(line.trim());

                ParserState::settle(pending)
            }
        }
    }

    /// Start a record from a version heading line.
    fn open_version(&self, repo: &str, line: &str) -> VersionChangelog {
        let mut record = VersionChangelog::new(repo);
        record.title = strip_heading_marker(line).to_string();

        if let Some(version) = self.semver.captures(line).and_then(|caps| caps.get(1)) {
            record.version = version.as_str().to_string();
        }

        if let Some(date) = self.date.captures(line).and_then(|caps| caps.get(1)) {
            record.date = date.as_str().to_string();
        }

        if record.version.is_empty() {
            debug!(repo, heading = %record.title, "Heading has no version, block will be skipped");
        }

        record
    }
}

/// Parse a changelog document with a freshly built parser.
pub fn parse(repo: &str, document: &str) -> Vec<VersionChangelog> {
    ChangelogParser::new().parse(repo, document)
}

fn flush(record: VersionChangelog, records: &mut Vec<VersionChangelog>) {
    if record.is_complete() {
        records.push(record);
    }
}

fn strip_heading_marker(line: &str) -> &str {
    line.trim_start_matches('#').trim()
}
