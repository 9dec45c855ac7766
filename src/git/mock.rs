use std::collections::HashMap;
use std::sync::Mutex;

use git2::Oid;

use crate::error::{GateError, Result};
use crate::git::{Repository, TagInfo};

/// Mock repository for testing without actual git operations.
///
/// Fixtures (diff contents, pre-existing tags, injected failures) are set up
/// through the builder methods; every mutating trait call is recorded so
/// tests can assert which operations were - or were not - attempted.
pub struct MockRepository {
    changed: Vec<String>,
    tags: Mutex<HashMap<String, Oid>>,
    tag_times: HashMap<String, Option<i64>>,
    fetched_branches: Mutex<Vec<String>>,
    fetched_tags: Mutex<u32>,
    created: Mutex<Vec<String>>,
    pushed: Mutex<Vec<String>>,
    create_failure: Option<String>,
    push_failure: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            changed: Vec::new(),
            tags: Mutex::new(HashMap::new()),
            tag_times: HashMap::new(),
            fetched_branches: Mutex::new(Vec::new()),
            fetched_tags: Mutex::new(0),
            created: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
            create_failure: None,
            push_failure: None,
        }
    }

    /// Set the changed-file set returned by every diff
    pub fn set_changed_files<I, S>(&mut self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed = files.into_iter().map(Into::into).collect();
    }

    /// Add a pre-existing tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let name = name.into();
        self.tag_times.insert(name.clone(), None);
        self.tags.lock().unwrap().insert(name, oid);
    }

    /// Add a pre-existing tag with a commit timestamp
    pub fn add_tag_with_time(&mut self, name: impl Into<String>, oid: Oid, time: i64) {
        let name = name.into();
        self.tag_times.insert(name.clone(), Some(time));
        self.tags.lock().unwrap().insert(name, oid);
    }

    /// Make create_tag calls fail with the given message
    pub fn fail_create_with(&mut self, msg: impl Into<String>) {
        self.create_failure = Some(msg.into());
    }

    /// Make push_tag calls fail with the given message
    pub fn fail_push_with(&mut self, msg: impl Into<String>) {
        self.push_failure = Some(msg.into());
    }

    /// Tags created through the trait, in order
    pub fn created_tags(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    /// Tags pushed through the trait, in order
    pub fn pushed_tags(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }

    /// Branches fetched through the trait, as "remote/branch"
    pub fn fetched_branches(&self) -> Vec<String> {
        self.fetched_branches.lock().unwrap().clone()
    }

    /// Number of fetch_tags calls
    pub fn tag_fetch_count(&self) -> u32 {
        *self.fetched_tags.lock().unwrap()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.fetched_branches
            .lock()
            .unwrap()
            .push(format!("{}/{}", remote, branch));
        Ok(())
    }

    fn fetch_tags(&self, _remote: &str) -> Result<()> {
        *self.fetched_tags.lock().unwrap() += 1;
        Ok(())
    }

    fn changed_files(&self, _base_ref: &str, _head_ref: &str) -> Result<Vec<String>> {
        Ok(self.changed.clone())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.lock().unwrap().get(tag_name).copied())
    }

    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let tags = self.tags.lock().unwrap();
        let mut infos: Vec<TagInfo> = tags
            .keys()
            .map(|name| TagInfo {
                name: name.clone(),
                commit_time: self.tag_times.get(name).copied().flatten(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        if let Some(msg) = &self.create_failure {
            return Err(GateError::tag(msg.clone()));
        }

        let mut tags = self.tags.lock().unwrap();
        if tags.contains_key(name) {
            // Mirrors git's refusal to overwrite an existing refname.
            return Err(GateError::tag(format!(
                "tag '{}' already exists in repository",
                name
            )));
        }

        tags.insert(name.to_string(), target);
        self.created.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, _remote: &str, tag_name: &str) -> Result<()> {
        if let Some(msg) = &self.push_failure {
            return Err(GateError::remote(msg.clone()));
        }

        self.pushed.lock().unwrap().push(tag_name.to_string());
        Ok(())
    }
}
