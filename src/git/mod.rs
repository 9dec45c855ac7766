//! Git operations abstraction layer
//!
//! A trait-based abstraction over the version-control surface the gate
//! needs, with two implementations:
//!
//! - [repository::Git2Repository]: the real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! Gate code depends on the [Repository] trait rather than a concrete
//! implementation so the whole procedure can be exercised without a network
//! or a real repository.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// A tag name together with the timestamp of the commit it points to.
///
/// `commit_time` is seconds since the epoch, or `None` when the tag's
/// target cannot be resolved to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub commit_time: Option<i64>,
}

/// Common git operation trait for abstraction.
///
/// Covers exactly the collaborator surface the release gate uses: branch
/// and tag synchronization, name-only diffs, and tag lookup/creation/push.
/// Implementors must be `Send + Sync`.
pub trait Repository: Send + Sync {
    /// Fetch a branch from a remote, updating the remote-tracking ref.
    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Fetch all tags from a remote into the local view.
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Names of files differing between `base_ref` and `head_ref`.
    ///
    /// Both arguments are revspecs (branch name, remote-tracking ref, or
    /// commit hash). The diff is taken from the merge base of the two refs
    /// to `head_ref`, so commits only on the base side do not pollute the
    /// result. Paths are sorted.
    fn changed_files(&self, base_ref: &str, head_ref: &str) -> Result<Vec<String>>;

    /// Find a tag by name and get its OID.
    ///
    /// Handles both lightweight and annotated tags.
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - Object ID of the tag if it exists
    /// * `Ok(None)` - If the tag doesn't exist
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// All tags in the repository with their commit timestamps.
    fn list_tags(&self) -> Result<Vec<TagInfo>>;

    /// Create a lightweight tag at the given OID.
    ///
    /// Never overwrites: creation fails if the name is already taken.
    fn create_tag(&self, name: &str, target: Oid) -> Result<()>;

    /// Push a single tag ref to a remote.
    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()>;
}
