use std::path::Path;

use git2::{Oid, Repository as Git2Repo};

use crate::error::{GateError, Result};
use crate::git::TagInfo;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Fetch the given refspecs from a remote.
    ///
    /// Authentication tries SSH keys from ~/.ssh/, then the SSH agent,
    /// then default credentials.
    fn fetch_refspecs(&self, remote_name: &str, refspecs: &[&str]) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            GateError::remote(format!("remote '{}' not found", remote_name))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());

        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                GateError::remote(format!(
                    "failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        Ok(())
    }

    fn resolve_commit(&self, refspec: &str) -> Result<git2::Commit<'_>> {
        let object = self
            .repo
            .revparse_single(refspec)
            .map_err(|_| GateError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        object.peel_to_commit().map_err(|_| GateError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }
}

/// Remote callbacks with SSH credential resolution.
///
/// Tries key files in order of preference, then the SSH agent, then
/// whatever default credentials libgit2 can find.
fn credential_callbacks() -> git2::RemoteCallbacks<'static> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            let key_paths = vec![
                format!("{}/.ssh/id_ed25519", home),
                format!("{}/.ssh/id_rsa", home),
                format!("{}/.ssh/id_ecdsa", home),
            ];

            for key_path in key_paths {
                let path = std::path::Path::new(&key_path);
                if path.exists() {
                    if let Ok(cred) = git2::Cred::ssh_key(
                        username_from_url.unwrap_or("git"),
                        None,
                        path,
                        None,
                    ) {
                        return Ok(cred);
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let refspec = format!("+refs/heads/{}:refs/remotes/{}/{}", branch, remote, branch);
        self.fetch_refspecs(remote, &[refspec.as_str()])
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        self.fetch_refspecs(remote, &["+refs/tags/*:refs/tags/*"])
    }

    fn changed_files(&self, base_ref: &str, head_ref: &str) -> Result<Vec<String>> {
        let base_commit = self.resolve_commit(base_ref)?;
        let head_commit = self.resolve_commit(head_ref)?;

        // Diff from the merge base so commits that only landed on the base
        // branch after the fork point do not show up as changes.
        let merge_base = self.repo.merge_base(base_commit.id(), head_commit.id())?;
        let merge_base_tree = self.repo.find_commit(merge_base)?.tree()?;
        let head_tree = head_commit.tree()?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&merge_base_tree), Some(&head_tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned());

            if let Some(path) = path {
                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference
                    .peel(git2::ObjectType::Any)
                    .map_err(|e| GateError::tag(format!("cannot peel tag: {}", e)))?
                    .id();

                Ok(Some(oid))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GateError::tag(format!(
                "cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            // Commit metadata can be missing (deleted objects, tags on
            // non-commits); report the tag anyway with no timestamp.
            let commit_time = self
                .repo
                .find_reference(&format!("refs/tags/{}", name))
                .ok()
                .and_then(|r| r.peel_to_commit().ok())
                .map(|c| c.time().seconds());

            tags.push(TagInfo {
                name: name.to_string(),
                commit_time,
            });
        }

        Ok(tags)
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| GateError::tag(format!("cannot find object {}: {}", target, e)))?;

        // force=false: an existing name is an error, never an overwrite
        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| GateError::tag(format!("cannot create tag: {}", e)))?;

        Ok(())
    }

    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GateError::remote(format!("cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = credential_callbacks();

        // Surface per-reference rejections (e.g. the remote already has the
        // tag) as errors instead of a silent "success".
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", tag_name, tag_name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    GateError::remote(format!("network error during push: {}", e))
                } else {
                    GateError::remote(format!("push failed: {}", e))
                }
            })?;

        Ok(())
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send + Sync.
// git2 library is thread-safe for read operations via libgit2's thread-safe design.
unsafe impl Sync for Git2Repository {}
