use std::fmt;

use crate::error::{GateError, Result};

/// A release version: a bare major.minor.patch triple.
///
/// Pre-release and build metadata are rejected on parse; the gate only ever
/// tags plain triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string, tolerating a leading 'v' or 'V' marker
    /// (e.g. "v1.2.3" -> Version(1,2,3)).
    ///
    /// # Errors
    /// Returns [`GateError::InvalidVersionFormat`] if the remainder is not a
    /// bare semver triple.
    pub fn parse(input: &str) -> Result<Self> {
        let bare = input.trim_start_matches('v').trim_start_matches('V');

        let parsed = semver::Version::parse(bare)
            .map_err(|_| GateError::InvalidVersionFormat(input.to_string()))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(GateError::InvalidVersionFormat(input.to_string()));
        }

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_with_marker() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("V0.1.0").unwrap(), Version::new(0, 1, 0));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("a.b.c").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_parse_rejects_prerelease_and_build() {
        assert!(Version::parse("1.2.3-rc.1").is_err());
        assert!(Version::parse("1.2.3+build.5").is_err());
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(2, 3, 1);
        assert_eq!(v.to_string(), "2.3.1");
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 10, 0));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }
}
