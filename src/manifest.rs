//! Version discovery in the build-declaration file.
//!
//! Two independent checks: [`extract_version`] pulls the version out of a
//! `project(... VERSION X.Y.Z)` declaration, and [`is_valid_version`] checks
//! the shape of a version string. The gate runs both.

use regex::Regex;

/// First `project(<name> VERSION <major>.<minor>.<patch>)` declaration,
/// case-insensitive.
const VERSION_DECL_PATTERN: &str = r"(?i)project\([^)]*VERSION\s+([0-9]+\.[0-9]+\.[0-9]+)";

/// Accepted version shape: bare triple with an optional leading 'v'.
const VERSION_SHAPE_PATTERN: &str = r"^v?\d+\.\d+\.\d+$";

/// Extract the declared version from manifest content.
///
/// Only the first declaration is used. Returns `None` when no declaration
/// matches.
pub fn extract_version(content: &str) -> Option<String> {
    let re = match Regex::new(VERSION_DECL_PATTERN) {
        Ok(re) => re,
        Err(_) => return None,
    };

    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check a version string against `^v?\d+\.\d+\.\d+$`
pub fn is_valid_version(version: &str) -> bool {
    Regex::new(VERSION_SHAPE_PATTERN)
        .map(|re| re.is_match(version))
        .unwrap_or(false)
}
