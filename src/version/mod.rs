//! Version range resolution and release descriptor selection.

pub mod range;
pub mod release;

pub use range::{compare_precedence, find_available, get_relevant_versions, highest_version, parse_version};
pub use release::{latest_release_in_dir, suite_iteration, RELEASES_PREFIX};
