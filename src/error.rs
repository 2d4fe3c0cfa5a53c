use std::path::PathBuf;

use thiserror::Error;

use crate::object::{Id, Kind, ParseIdError};

/// Describes the potential error conditions that might arise from mingit
/// object store, reference, and checkout operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No reference or object matches the given name.
    #[error("no such reference or object `{0}`")]
    NotFound(String),

    /// A short name matched more than one object.
    #[error("ambiguous reference `{name}`: candidates are {}", format_candidates(.candidates))]
    Ambiguous { name: String, candidates: Vec<Id> },

    /// A stored object record violates the `<kind> <len>\0<payload>` layout.
    #[error("malformed object {id}: {reason}")]
    MalformedObject { id: Id, reason: String },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// Commit or tag headers don't follow the key-value-list-with-message grammar.
    #[error("malformed commit: {0}")]
    MalformedCommit(String),

    #[error("malformed reference `{name}`: {reason}")]
    MalformedRef { name: String, reason: String },

    #[error("unknown object kind `{0}`")]
    UnknownObjectKind(String),

    #[error("object {id} is a {found}, expected a {expected}")]
    UnexpectedKind { id: Id, expected: Kind, found: Kind },

    #[error("checkout target is not empty: {0}")]
    CheckoutTargetNotEmpty(PathBuf),

    #[error("checkout target is not a directory: {0}")]
    CheckoutTargetNotDirectory(PathBuf),

    /// Following `ref:` indirections came back to a reference already visited.
    #[error("reference cycle detected at `{0}`")]
    ReferenceCycle(String),

    #[error("work dir doesn't exist: {0}")]
    WorkDirDoesntExist(PathBuf),

    #[error("git dir doesn't exist: {0}")]
    GitDirDoesntExist(PathBuf),

    #[error(transparent)]
    InvalidId(#[from] ParseIdError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

fn format_candidates(candidates: &[Id]) -> String {
    candidates
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// A specialized `Result` type for mingit operations.
pub type Result<T> = std::result::Result<T, Error>;
