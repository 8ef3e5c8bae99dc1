//! GitHub token lookup.
//!
//! Order:
//! 1. Explicit token (`--token`)
//! 2. GITHUB_TOKEN env var
//! 3. GH_TOKEN env var
//!
//! No token means unauthenticated requests, which GitHub rate limits harder.

use std::env;

use tracing::debug;

/// Resolve the GitHub token to use, if any. Empty values are ignored.
pub fn github_token(explicit: Option<&str>) -> Option<String> {
    if let Some(token) = explicit.filter(|token| !token.is_empty()) {
        return Some(token.to_string());
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                debug!(source = var, "Using GitHub token from environment");
                return Some(token);
            }
        }
    }

    None
}
