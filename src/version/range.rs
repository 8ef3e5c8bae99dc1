//! Resolve which published versions fall between two pins.

use std::cmp::Ordering;

use semver::Version;
use tracing::debug;

use crate::error::VersionError;

/// Parse a version literal, accepting an optional leading `v`.
pub fn parse_version(raw: &str) -> Result<Version, VersionError> {
    let bare = raw.strip_prefix('v').unwrap_or(raw);
    Version::parse(bare).map_err(|e| VersionError::ParseFailed(raw.to_string(), e))
}

/// Compare by semver precedence. Build metadata is ignored.
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Return the literal of the highest version in `versions`.
///
/// The literal is returned as given (a `v` prefix is kept). Ties keep the
/// first occurrence.
pub fn highest_version<S: AsRef<str>>(versions: &[S]) -> Result<String, VersionError> {
    let mut highest: Option<(&str, Version)> = None;

    for raw in versions {
        let raw = raw.as_ref();
        let version = parse_version(raw)?;

        let is_higher = match &highest {
            Some((_, current)) => compare_precedence(current, &version) == Ordering::Less,
            None => true,
        };

        if is_higher {
            highest = Some((raw, version));
        }
    }

    highest
        .map(|(raw, _)| raw.to_string())
        .ok_or(VersionError::NoVersions)
}

/// Versions from `available` after `lower` (exclusive) up to `upper` (inclusive).
///
/// - An empty `lower` asks for `upper` alone.
/// - An empty `upper` means the highest available version. If `lower` is
///   already that version there is nothing new and the result is empty.
///   With both bounds empty there is no lower bound to parse, which is an
///   error naming the empty literal.
/// - Swapped bounds are put back in order.
/// - Equal bounds return that single version, which must be available.
///
/// Results are sorted ascending and rendered with a `v` prefix. An open
/// range with no versions in it is not an error.
pub fn get_relevant_versions<S: AsRef<str>>(
    available: &[S],
    lower: &str,
    upper: &str,
) -> Result<Vec<String>, VersionError> {
    let lower_raw = if lower.is_empty() { upper } else { lower }.to_string();
    let mut upper_raw = upper.to_string();

    if upper_raw.is_empty() {
        upper_raw = highest_version(available)?;

        if !lower_raw.is_empty()
            && compare_precedence(&parse_version(&lower_raw)?, &parse_version(&upper_raw)?)
                == Ordering::Equal
        {
            debug!(lower = %lower_raw, "Lower bound is already the highest available version");
            return Ok(Vec::new());
        }
    }

    let mut high = parse_version(&upper_raw)?;
    let mut low = parse_version(&lower_raw)?;

    if compare_precedence(&high, &low) == Ordering::Less {
        std::mem::swap(&mut high, &mut low);
    }

    let parsed = available
        .iter()
        .map(|raw| parse_version(raw.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    if compare_precedence(&high, &low) == Ordering::Equal {
        if parsed
            .iter()
            .any(|version| compare_precedence(version, &low) == Ordering::Equal)
        {
            return Ok(vec![format!("v{}", low)]);
        }

        return Err(VersionError::NotAvailable {
            version: low,
            available: available.iter().map(|raw| raw.as_ref().to_string()).collect(),
        });
    }

    let mut relevant: Vec<Version> = parsed
        .into_iter()
        .filter(|version| {
            compare_precedence(version, &low) == Ordering::Greater
                && compare_precedence(version, &high) != Ordering::Greater
        })
        .collect();

    relevant.sort_by(compare_precedence);

    debug!(
        lower = %low,
        upper = %high,
        count = relevant.len(),
        "Resolved relevant versions"
    );

    Ok(relevant.iter().map(|version| format!("v{}", version)).collect())
}

/// Find the literal in `available` that denotes the same version as `version`.
pub fn find_available<'a, S: AsRef<str>>(available: &'a [S], version: &str) -> Option<&'a str> {
    let wanted = parse_version(version).ok()?;

    available.iter().map(|raw| raw.as_ref()).find(|raw| {
        parse_version(raw)
            .map(|candidate| compare_precedence(&candidate, &wanted) == Ordering::Equal)
            .unwrap_or(false)
    })
}
