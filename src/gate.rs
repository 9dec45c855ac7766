//! The release gate: a linear sequence of preconditions ending in a
//! created-and-pushed tag.
//!
//! Every step must succeed before the next runs. There is no retry and no
//! rollback; if the push fails after the tag was created locally, the local
//! tag is left in place and the run still fails.

use git2::Oid;

use crate::config::{CiContext, Config};
use crate::domain::{Tag, TagPattern, Version};
use crate::error::{GateError, Result};
use crate::git::Repository;
use crate::manifest;
use crate::ui;

/// Result of a successful gate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    /// The tag that was created and pushed
    pub tag: Tag,

    /// The commit hash the tag points at
    pub target: String,
}

/// Validates a version-bump pull request and publishes the release tag.
///
/// Holds everything the procedure needs up front: tunables, the CI context
/// for the pull request, and the repository. The gate never reads the
/// environment or prompts; all failures are terminal.
pub struct ReleaseGate<'a, R: Repository> {
    config: Config,
    ctx: CiContext,
    repo: &'a R,
}

impl<'a, R: Repository> ReleaseGate<'a, R> {
    pub fn new(config: Config, ctx: CiContext, repo: &'a R) -> Self {
        ReleaseGate { config, ctx, repo }
    }

    /// Run the gate to completion.
    ///
    /// Steps, in order, each a hard precondition for the next:
    /// 1. fetch the base branch
    /// 2. check the changed-file set is exactly the manifest
    /// 3. extract the declared version from the manifest
    /// 4. validate the version shape (independent of extraction)
    /// 5. compose the canonical tag name
    /// 6. fetch tags and check the name is free
    /// 7. create the tag at the head commit
    /// 8. push the tag
    pub fn run(&self) -> Result<GateOutcome> {
        let pattern = TagPattern::new(&self.config.tag_pattern)?;
        let remote = &self.config.remote;

        ui::display_status(&format!(
            "Gating pull request #{}: {} -> {}",
            self.ctx.pr_number, self.ctx.head_branch, self.ctx.base_branch
        ));

        // Step 1: sync the base branch from the remote.
        ui::display_status(&format!("Fetching {}/{}", remote, self.ctx.base_branch));
        self.repo.fetch_branch(remote, &self.ctx.base_branch)?;

        // Step 2: the diff must touch exactly the manifest, nothing else.
        let base_ref = format!("{}/{}", remote, self.ctx.base_branch);
        let changed = self.repo.changed_files(&base_ref, &self.ctx.head_sha)?;
        if changed.len() != 1 || changed[0] != self.config.manifest {
            return Err(GateError::ScopeViolation {
                allowed: self.config.manifest.clone(),
                files: changed,
            });
        }

        // Steps 3-4: extract, then validate the shape as a separate check.
        let content = std::fs::read_to_string(&self.config.manifest)?;
        let raw_version =
            manifest::extract_version(&content).ok_or_else(|| GateError::VersionNotFound {
                file: self.config.manifest.clone(),
            })?;
        ui::display_status(&format!("Extracted version: {}", raw_version));

        if !manifest::is_valid_version(&raw_version) {
            return Err(GateError::InvalidVersionFormat(raw_version));
        }

        // Step 5: canonical tag name from the parsed triple.
        let version = Version::parse(&raw_version)?;
        let tag = pattern.format(&version);

        // Step 6: best-effort existence pre-check. Creation and push remain
        // the final arbiters against races.
        self.repo.fetch_tags(remote)?;
        if self.repo.find_tag_oid(&tag.name)?.is_some() {
            return Err(GateError::TagAlreadyExists(tag.name));
        }

        // Step 7: tag the externally supplied head commit.
        let target = Oid::from_str(&self.ctx.head_sha).map_err(|e| {
            GateError::config(format!(
                "head commit hash '{}' is not a valid object id: {}",
                self.ctx.head_sha, e
            ))
        })?;

        ui::display_status(&format!("Creating tag {} at {}", tag.name, self.ctx.head_sha));
        self.repo
            .create_tag(&tag.name, target)
            .map_err(|e| GateError::TagCreationFailed {
                tag: tag.name.clone(),
                source: Box::new(e),
            })?;

        // Step 8: publish. No rollback of the local tag on failure.
        ui::display_status(&format!("Pushing tag {} to {}", tag.name, remote));
        self.repo
            .push_tag(remote, &tag.name)
            .map_err(|e| GateError::TagPushFailed {
                tag: tag.name.clone(),
                remote: remote.clone(),
                source: Box::new(e),
            })?;

        Ok(GateOutcome {
            tag,
            target: self.ctx.head_sha.clone(),
        })
    }
}
