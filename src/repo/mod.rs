//! A repository whose objects and references live on the local file system.
//!
//! This uses the same `.git` folder layout as command-line git, so objects
//! written here can be read by git and vice versa. Creating that folder is
//! the caller's business: `Repo` only opens one that already exists.

use std::path::{Path, PathBuf};

use flate2::Compression;

use crate::object::TreeOrdering;
use crate::{Error, Result};

mod checkout;

mod inspect;
pub use inspect::{log_graphviz, TreeListing};

mod loose;

mod refs;
pub use refs::RefTarget;

mod resolve;

/// Settings that change how a `Repo` writes objects.
#[derive(Clone, Debug, PartialEq)]
pub struct RepoOptions {
    dry_run: bool,
    tree_ordering: TreeOrdering,
    compression: Compression,
}

impl Default for RepoOptions {
    fn default() -> Self {
        RepoOptions {
            dry_run: false,
            tree_ordering: TreeOrdering::default(),
            compression: Compression::default(),
        }
    }
}

impl RepoOptions {
    /// When set, writes compute and return object IDs without touching disk.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Entry order used when tree objects are written.
    pub fn with_tree_ordering(mut self, tree_ordering: TreeOrdering) -> Self {
        self.tree_ordering = tree_ordering;
        self
    }

    /// zlib level for newly written objects.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn tree_ordering(&self) -> TreeOrdering {
        self.tree_ordering
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}

/// An on-disk git repository.
#[derive(Debug)]
pub struct Repo {
    git_dir: PathBuf,
    options: RepoOptions,
}

impl Repo {
    /// Open the repository whose working directory is `work_dir`.
    ///
    /// A `.git` directory should exist at this path.
    pub fn open(work_dir: &Path) -> Result<Self> {
        if !work_dir.exists() {
            return Err(Error::WorkDirDoesntExist(work_dir.to_path_buf()));
        }

        Repo::from_git_dir(&work_dir.join(".git"))
    }

    /// Open a repository given its metadata directory (usually `.git`).
    pub fn from_git_dir(git_dir: &Path) -> Result<Self> {
        if !git_dir.is_dir() {
            return Err(Error::GitDirDoesntExist(git_dir.to_path_buf()));
        }

        Ok(Repo {
            git_dir: git_dir.to_path_buf(),
            options: RepoOptions::default(),
        })
    }

    /// Replace this repository's options.
    pub fn with_options(mut self, options: RepoOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RepoOptions {
        &self.options
    }

    /// Return the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_path()
    }
}
