use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GateError, Result};

/// Environment variables supplied by the CI runner for each pull request.
pub const ENV_BASE_BRANCH: &str = "GITHUB_BASE_REF";
pub const ENV_HEAD_BRANCH: &str = "GITHUB_HEAD_REF";
pub const ENV_HEAD_SHA: &str = "GITHUB_SHA";

fn default_remote() -> String {
    "origin".to_string()
}

fn default_manifest() -> String {
    "CMakeLists.txt".to_string()
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_report_limit() -> usize {
    10
}

/// Tunable settings for the release gate.
///
/// Everything has a default; a config file only needs to name the fields it
/// overrides.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Remote used for fetch and push operations.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// The single file a release pull request is allowed to modify, and the
    /// file the version declaration is read from.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Tag naming pattern; must contain the `{version}` placeholder.
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Number of tags shown by the recent-tags report.
    #[serde(default = "default_report_limit")]
    pub report_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            manifest: default_manifest(),
            tag_pattern: default_tag_pattern(),
            report_limit: default_report_limit(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasegate.toml` in current directory
/// 3. `.releasegate.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// A file that exists but cannot be read or parsed is an error, not a
/// fallthrough.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releasegate.toml").exists() {
        fs::read_to_string("./releasegate.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".releasegate.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GateError::config(format!("cannot parse config file: {}", e)))?;
    Ok(config)
}

/// Identifying context for the pull request being gated.
///
/// Built once at startup from the CI environment and passed into the gate;
/// the gate itself never reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CiContext {
    /// Target branch of the pull request (e.g. "main").
    pub base_branch: String,

    /// Source branch of the pull request. Informational: CI checkouts are
    /// usually detached, so the commit hash is what gets diffed and tagged.
    pub head_branch: String,

    /// Commit hash the tag will point at.
    pub head_sha: String,

    /// Pull request identifier, used for logging only.
    pub pr_number: String,
}

impl CiContext {
    /// Build the context from the CI environment variables.
    ///
    /// # Errors
    /// Returns a configuration error naming the first variable that is
    /// missing or empty.
    pub fn from_env(pr_number: impl Into<String>) -> Result<Self> {
        Ok(CiContext {
            base_branch: require_env(ENV_BASE_BRANCH)?,
            head_branch: require_env(ENV_HEAD_BRANCH)?,
            head_sha: require_env(ENV_HEAD_SHA)?,
            pr_number: pr_number.into(),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GateError::config(format!(
            "environment variable {} is not set",
            name
        ))),
    }
}
