//! Changelog parsing, combining and writing.

pub mod combined;
pub mod parser;
pub mod record;
pub mod writer;

pub use combined::{CombinedChangelog, TaggedEntry};
pub use parser::{parse, ChangelogParser, LineKind};
pub use record::{find_version, VersionChangelog, FALLBACK_SECTION};
pub use writer::{render_release, write_release, SuiteRelease};
