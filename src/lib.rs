//! The object-storage core of a minimal git-compatible version control tool.
//!
//! Objects (blobs, trees, commits, tags) are stored content-addressed by the
//! SHA-1 of their canonical record, compressed with zlib, in the same loose
//! object layout command-line git uses. On top of the store this crate
//! resolves references and object names, and checks trees out into a
//! working directory.
//!
//! Repository bootstrap, configuration files, and command-line handling are
//! left to callers.

mod error;
pub use error::{Error, Result};

pub mod object;

pub mod repo;
pub use repo::{Repo, RepoOptions};

#[cfg(test)]
pub(crate) mod test_support;
