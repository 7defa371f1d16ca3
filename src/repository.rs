//! # Version Control Seam
//!
//! The synchronizer never calls `git` directly. It goes through the
//! [`GitOperations`] trait, which covers the three operations the integration
//! procedure needs: clone, read the current revision, and check out a
//! revision.
//!
//! [`SystemGit`] is the real implementation and shells out to the `git`
//! binary via [`crate::git`]. Tests swap in a mock that fabricates working
//! copies on disk, so the procedure can be exercised without a network or a
//! git installation.

use crate::error::Result;
use std::path::Path;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clones `url` into `target_dir`, which does not exist yet.
    fn clone_repo(&self, name: &str, url: &str, target_dir: &Path) -> Result<()>;

    /// Returns the revision identifier currently checked out in `repo_dir`.
    fn head_revision(&self, repo_dir: &Path) -> Result<String>;

    /// Moves the working copy in `repo_dir` to `revision`.
    fn checkout(&self, name: &str, repo_dir: &Path, revision: &str) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitOperations for SystemGit {
    fn clone_repo(&self, name: &str, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(name, url, target_dir)
    }

    fn head_revision(&self, repo_dir: &Path) -> Result<String> {
        crate::git::head_revision(repo_dir)
    }

    fn checkout(&self, name: &str, repo_dir: &Path, revision: &str) -> Result<()> {
        crate::git::checkout(name, repo_dir, revision)
    }
}
