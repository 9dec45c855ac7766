use regex::Regex;

use crate::domain::Version;
use crate::error::{GateError, Result};

/// A composed git tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tag naming pattern (e.g. "v{version}", "release-{version}").
///
/// The placeholder is validated and the match regex compiled once at
/// construction, so a bad pattern from the config file fails up front.
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a new tag pattern.
    ///
    /// # Errors
    /// Returns a tag error if the pattern lacks the `{version}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();

        if !pattern.contains("{version}") {
            return Err(GateError::tag(format!(
                "pattern '{}' must contain the {{version}} placeholder",
                pattern
            )));
        }

        // Escape everything, then put a version-shaped capture where the
        // placeholder was.
        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| GateError::tag(format!("invalid pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    /// Compose the canonical tag name for a version.
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> Tag {
        Tag::new(self.pattern.replace("{version}", &version.to_string()))
    }

    /// Check whether an existing tag name matches this pattern
    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }
}
