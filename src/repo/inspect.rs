//! Read-only views over stored objects: the library side of `cat-file`,
//! `ls-tree`, `log`, and `rev-parse`.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter, Write};

use super::Repo;
use crate::object::{Commit, FileMode, Id, Kind, Tree};
use crate::{Error, Result};

/// One line of a tree listing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeListing {
    /// Mode zero-padded to six digits.
    pub mode: String,
    pub kind: Kind,
    pub id: Id,
    pub path: Vec<u8>,
}

impl Display for TreeListing {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}\t{}",
            self.mode,
            self.kind,
            self.id,
            String::from_utf8_lossy(&self.path)
        )
    }
}

impl Repo {
    /// Return the payload of the object `name` resolves to, following tags
    /// and commits until an object of `kind` is reached.
    pub fn cat_file(&self, name: &str, kind: Kind) -> Result<Vec<u8>> {
        let id = self.require_object(name, kind)?;
        Ok(self.read_raw(id)?.1)
    }

    /// Resolve `name` like `git rev-parse`, optionally peeling to `kind`.
    pub fn rev_parse(&self, name: &str, kind: Option<Kind>) -> Result<Option<Id>> {
        self.find_object(name, kind, true)
    }

    /// List the entries of the tree `name` resolves to.
    pub fn ls_tree(&self, name: &str) -> Result<Vec<TreeListing>> {
        let id = self.require_object(name, Kind::Tree)?;
        let tree: Tree = self.read_as(id)?;

        tree.entries()
            .iter()
            .map(|entry| {
                let kind = match entry.file_mode() {
                    // Gitlinks name a commit in another repository.
                    Some(FileMode::Submodule) => Kind::Commit,
                    _ => self.read_raw(entry.id())?.0,
                };

                Ok(TreeListing {
                    mode: entry.display_mode(),
                    kind,
                    id: entry.id(),
                    path: entry.path().to_vec(),
                })
            })
            .collect()
    }

    /// Walk commit history from `start`, returning `(child, parent)` edges.
    ///
    /// Each commit is visited once, depth-first.
    pub fn log(&self, start: Id) -> Result<Vec<(Id, Id)>> {
        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![start];

        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }

            let commit: Commit = self.read_as(id)?;
            for parent in commit.parents() {
                edges.push((id, *parent));
            }
            pending.extend(commit.parents().iter().rev());
        }

        Ok(edges)
    }

    fn require_object(&self, name: &str, kind: Kind) -> Result<Id> {
        self.find_object(name, Some(kind), true)?
            .ok_or_else(|| Error::NotFound(format!("{} ({})", name, kind)))
    }
}

/// Render history edges as a Graphviz `digraph`.
pub fn log_graphviz(edges: &[(Id, Id)]) -> String {
    let mut r = String::from("digraph log {\n");
    for (child, parent) in edges {
        // Writing to a String can't fail.
        let _ = writeln!(r, "  c_{} -> c_{};", child, parent);
    }
    r.push_str("}\n");
    r
}
