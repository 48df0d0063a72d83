//! # Changed Files Sources
//!
//! Where the list of changed paths comes from. Paths are reported relative
//! to the working tree root the source was asked about.
//!
//! - **GitChangedFiles**: diff against the merge base with a base branch
//!   using the system `git` binary
//! - **StaticChangedFiles**: a fixed, caller-supplied list

mod git;

use std::path::Path;
use std::time::Duration;

pub use git::GitChangedFiles;

use crate::constants::detection::{
    DEFAULT_BASE_BRANCH, DEFAULT_GIT_TIMEOUT, DEFAULT_INCLUDE_UNTRACKED,
};
use crate::error::AffectedError;

/// Options for a changed files query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFilesOptions {
    /// Branch or revision whose merge base with `HEAD` is the baseline
    pub base_branch: String,
    pub include_untracked: bool,
    /// Upper bound for each external process
    pub timeout: Duration,
}

impl Default for ChangedFilesOptions {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            include_untracked: DEFAULT_INCLUDE_UNTRACKED,
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }
}

impl ChangedFilesOptions {
    pub fn with_base_branch(mut self, base_branch: impl Into<String>) -> Self {
        self.base_branch = base_branch.into();
        self
    }

    pub fn with_include_untracked(mut self, include_untracked: bool) -> Self {
        self.include_untracked = include_untracked;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Produces the changed file paths of a working tree
pub trait ChangedFilesSource {
    fn changed_files(
        &self,
        working_tree_root: &Path,
        options: &ChangedFilesOptions,
    ) -> Result<Vec<String>, AffectedError>;
}

/// A fixed list of changed files, returned as given
#[derive(Debug, Clone, Default)]
pub struct StaticChangedFiles {
    files: Vec<String>,
}

impl StaticChangedFiles {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChangedFilesSource for StaticChangedFiles {
    fn changed_files(
        &self,
        _working_tree_root: &Path,
        _options: &ChangedFilesOptions,
    ) -> Result<Vec<String>, AffectedError> {
        Ok(self.files.clone())
    }
}
