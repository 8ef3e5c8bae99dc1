//! Suite descriptors and component changelog collection.

pub mod collect;
pub mod config;
pub mod source;

pub use collect::{collect_suite, combined_changelog, SuiteCategory, SuiteComponent};
pub use config::{Category, Repository, Section, SuiteConfig};
pub use source::ReleaseSource;
