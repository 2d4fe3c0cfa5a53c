use std::collections::HashSet;
use std::fs;

use tracing::debug;

use super::Repo;
use crate::object::{is_hex, Id, Kind, Object};
use crate::{Error, Result};

/// Branch and tag namespaces searched for a bare name.
const REF_PREFIXES: [&str; 2] = ["refs/tags/", "refs/heads/"];

/// Shortest hex prefix accepted as an abbreviated object ID.
const MIN_SHORT_ID: usize = 4;

impl Repo {
    /// Produce every object ID that `name` could refer to.
    ///
    /// `HEAD` is resolved through its reference chain. A full 40-digit hex ID
    /// is taken as-is. A hex prefix of at least four digits is matched against
    /// stored objects. Tag and branch names are looked up under `refs/tags/`
    /// and `refs/heads/`. Ambiguous names produce several candidates.
    pub fn resolve_name(&self, name: &str) -> Result<Vec<Id>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        if name == "HEAD" {
            return Ok(vec![self.resolve_ref("HEAD")?]);
        }

        let mut candidates = Vec::new();

        if name.len() >= MIN_SHORT_ID && is_hex(name.as_bytes()) {
            if name.len() == 40 {
                candidates.push(Id::from_hex(name)?);
            } else if name.len() < 40 {
                candidates.extend(self.expand_short_id(&name.to_ascii_lowercase())?);
            }
        }

        for prefix in REF_PREFIXES.iter() {
            let ref_name = format!("{}{}", prefix, name);
            if self.git_dir.join(&ref_name).is_file() {
                candidates.push(self.resolve_ref(&ref_name)?);
            }
        }

        let mut seen = HashSet::new();
        candidates.retain(|id| seen.insert(*id));

        debug!(%name, candidates = candidates.len(), "resolved name");
        Ok(candidates)
    }

    /// Find stored objects whose ID starts with `prefix` (lower-case hex).
    fn expand_short_id(&self, prefix: &str) -> Result<Vec<Id>> {
        let bucket = self.bucket_dir(&prefix[..2]);
        if !bucket.is_dir() {
            return Ok(Vec::new());
        }

        let rest = &prefix[2..];
        let mut matches = Vec::new();

        for entry in fs::read_dir(&bucket)? {
            let file_name = entry?.file_name();
            let file_name = match file_name.to_str() {
                Some(f) => f,
                None => continue,
            };

            if file_name.starts_with(rest) {
                // Skip anything that isn't an object file (e.g., an abandoned temp file).
                if let Ok(id) = Id::from_hex(format!("{}{}", &prefix[..2], file_name)) {
                    matches.push(id);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Resolve `name` to exactly one object, optionally of a wanted kind.
    ///
    /// With `want` set, the resolved object is read and, if its kind differs,
    /// one level of indirection is followed at a time: a tag to its `object`,
    /// or a commit to its `tree` when a tree is wanted. Returns `Ok(None)`
    /// when no object of the wanted kind can be reached (or `follow` is false
    /// and the first object has the wrong kind).
    pub fn find_object(&self, name: &str, want: Option<Kind>, follow: bool) -> Result<Option<Id>> {
        let candidates = self.resolve_name(name)?;

        let mut id = match candidates.len() {
            0 => return Err(Error::NotFound(name.to_string())),
            1 => candidates[0],
            _ => {
                return Err(Error::Ambiguous {
                    name: name.to_string(),
                    candidates,
                })
            }
        };

        let want = match want {
            Some(want) => want,
            None => return Ok(Some(id)),
        };

        let mut visited = HashSet::new();

        while visited.insert(id) {
            let object = self.read_object(id)?;
            if object.kind() == want {
                return Ok(Some(id));
            }

            if !follow {
                return Ok(None);
            }

            id = match object {
                Object::Tag(tag) => tag.object(),
                Object::Commit(commit) if want == Kind::Tree => commit.tree(),
                _ => return Ok(None),
            };

            debug!(%id, %want, "following to find wanted kind");
        }

        Ok(None)
    }
}
