use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path};

use tracing::{debug, warn};

use super::Repo;
use crate::object::Id;
use crate::{Error, Result};

const SYMREF_PREFIX: &str = "ref: ";

/// The content of a single reference file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefTarget {
    /// Points directly at an object.
    Direct(Id),

    /// Points at another reference (e.g., `HEAD` -> `refs/heads/master`).
    Symbolic(String),
}

impl Repo {
    /// Read one reference file without following it.
    ///
    /// `name` is relative to the `.git` directory (`HEAD`, `refs/heads/master`).
    pub fn read_ref(&self, name: &str) -> Result<RefTarget> {
        let bytes = match fs::read(self.git_dir.join(name)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        let content = String::from_utf8(bytes).map_err(|_| malformed(name, "not UTF-8"))?;
        let content = content.trim_end_matches(&['\n', '\r'][..]);

        if let Some(target) = content.strip_prefix(SYMREF_PREFIX) {
            let target = target.trim();
            if target.is_empty() {
                return Err(malformed(name, "empty symbolic target"));
            }
            // Targets name another ref relative to the `.git` directory.
            if !Path::new(target)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
            {
                return Err(malformed(name, "symbolic target leaves the git directory"));
            }
            Ok(RefTarget::Symbolic(target.to_string()))
        } else {
            Id::from_hex(content)
                .map(RefTarget::Direct)
                .map_err(|err| malformed(name, &err.to_string()))
        }
    }

    /// Follow `ref: ` indirections from `name` until a direct object ID is found.
    pub fn resolve_ref(&self, name: &str) -> Result<Id> {
        let mut visited = HashSet::new();
        let mut current = name.to_string();

        loop {
            if !visited.insert(current.clone()) {
                return Err(Error::ReferenceCycle(current));
            }

            match self.read_ref(&current)? {
                RefTarget::Direct(id) => {
                    debug!(reference = name, %id, steps = visited.len(), "resolved reference");
                    return Ok(id);
                }
                RefTarget::Symbolic(target) => {
                    debug!(from = %current, to = %target, "following symbolic reference");
                    current = target;
                }
            }
        }
    }

    /// List every reference under `refs/` with the object it resolves to.
    ///
    /// Names are full (`refs/heads/master`) and sorted the way a depth-first
    /// walk over sorted directory entries visits them.
    pub fn list_refs(&self) -> Result<Vec<(String, Id)>> {
        let mut refs = Vec::new();
        let refs_dir = self.git_dir.join("refs");

        if refs_dir.is_dir() {
            self.collect_refs(&refs_dir, "refs", &mut refs)?;
        }

        Ok(refs)
    }

    /// List the names of all tags (relative to `refs/tags/`).
    pub fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .list_refs()?
            .into_iter()
            .filter_map(|(name, _)| name.strip_prefix("refs/tags/").map(str::to_string))
            .collect())
    }

    fn collect_refs(&self, dir: &Path, prefix: &str, refs: &mut Vec<(String, Id)>) -> Result<()> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push((name, entry.path())),
                Err(name) => warn!(?name, "skipping reference with non-UTF-8 name"),
            }
        }
        names.sort();

        for (name, path) in names {
            let full_name = format!("{}/{}", prefix, name);
            if path.is_dir() {
                self.collect_refs(&path, &full_name, refs)?;
            } else {
                let id = self.resolve_ref(&full_name)?;
                refs.push((full_name, id));
            }
        }

        Ok(())
    }
}

fn malformed(name: &str, reason: &str) -> Error {
    Error::MalformedRef {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
