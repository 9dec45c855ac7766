use thiserror::Error;

/// Unified error type for release-gate operations.
///
/// Every variant is terminal: the binary maps each one to a printed
/// diagnostic and exit code 1. `TagCreationFailed` and `TagPushFailed`
/// wrap the underlying error instead of swallowing it.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("pull request must only modify {allowed}, changed files: [{}]", .files.join(", "))]
    ScopeViolation { allowed: String, files: Vec<String> },

    #[error("could not find a version declaration in {file}")]
    VersionNotFound { file: String },

    #[error("invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    #[error("tag '{0}' already exists")]
    TagAlreadyExists(String),

    #[error("failed to create tag '{tag}': {source}")]
    TagCreationFailed { tag: String, source: Box<GateError> },

    #[error("failed to push tag '{tag}' to '{remote}': {source}")]
    TagPushFailed {
        tag: String,
        remote: String,
        source: Box<GateError>,
    },

    #[error("{0}")]
    Usage(String),

    #[error("cannot resolve ref '{refspec}'")]
    RefNotFound { refspec: String },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("tag error: {0}")]
    Tag(String),

    #[error("remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-gate
pub type Result<T> = std::result::Result<T, GateError>;

impl GateError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GateError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GateError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GateError::Remote(msg.into())
    }

    /// Create a usage error with context
    pub fn usage(msg: impl Into<String>) -> Self {
        GateError::Usage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_violation_lists_files() {
        let err = GateError::ScopeViolation {
            allowed: "CMakeLists.txt".to_string(),
            files: vec!["CMakeLists.txt".to_string(), "README.md".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("must only modify CMakeLists.txt"));
        assert!(msg.contains("README.md"));
    }

    #[test]
    fn test_error_display_prefixes() {
        let cases = vec![
            (
                GateError::VersionNotFound {
                    file: "CMakeLists.txt".to_string(),
                },
                "could not find a version declaration",
            ),
            (
                GateError::InvalidVersionFormat("1.2".to_string()),
                "invalid version format",
            ),
            (
                GateError::TagAlreadyExists("v1.0.0".to_string()),
                "tag 'v1.0.0' already exists",
            ),
            (GateError::config("x"), "configuration error"),
            (GateError::tag("x"), "tag error"),
            (GateError::remote("x"), "remote operation failed"),
        ];

        for (err, expected_prefix) in cases {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "expected '{}' to start with '{}'",
                msg,
                expected_prefix
            );
        }
    }

    #[test]
    fn test_creation_failure_wraps_source() {
        let inner = GateError::tag("refname exists");
        let err = GateError::TagCreationFailed {
            tag: "v1.2.3".to_string(),
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to create tag 'v1.2.3'"));
        assert!(msg.contains("refname exists"));
    }

    #[test]
    fn test_push_failure_wraps_source() {
        let inner = GateError::remote("connection reset");
        let err = GateError::TagPushFailed {
            tag: "v1.2.3".to_string(),
            remote: "origin".to_string(),
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("push tag 'v1.2.3' to 'origin'"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GateError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let git_err = git2::Error::from_str("bad object");
        let err: GateError = git_err.into();
        assert!(err.to_string().contains("git operation failed"));
        assert!(err.to_string().contains("bad object"));
    }
}
