//! Tree objects: an ordered list of `(mode, path, id)` entries.
//!
//! Each entry is stored as `<mode> SP <path> NUL <20 raw id bytes>`, repeated
//! with no separator and no trailing padding.

use super::{parse_utils, Id, Kind, ObjectData};
use crate::{Error, Result};

mod file_mode;
pub use file_mode::FileMode;

mod ordering;
pub use ordering::{canonical_cmp, TreeOrdering};

/// A single entry in a tree object.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    mode: Vec<u8>,
    path: Vec<u8>,
    id: Id,
}

impl TreeEntry {
    /// Create a tree entry.
    ///
    /// `mode` must be 5 or 6 ASCII digits, as stored (`"100644"`, `"40000"`).
    /// `path` is a single path component: non-empty, without `/` or NUL.
    pub fn new<M, P>(mode: M, path: P, id: Id) -> Result<TreeEntry>
    where
        M: Into<Vec<u8>>,
        P: Into<Vec<u8>>,
    {
        let mode = mode.into();
        let path = path.into();

        check_mode(&mode)?;

        if path.is_empty() {
            return Err(Error::MalformedTree("empty path".to_string()));
        }
        if path.iter().any(|b| *b == 0 || *b == b'/') {
            return Err(Error::MalformedTree(format!(
                "path `{}` contains a separator or NUL",
                String::from_utf8_lossy(&path)
            )));
        }

        Ok(TreeEntry { mode, path, id })
    }

    /// Create a tree entry using git's standard spelling for `mode`.
    pub fn with_file_mode<P: Into<Vec<u8>>>(mode: FileMode, path: P, id: Id) -> Result<TreeEntry> {
        TreeEntry::new(mode.as_octal_str(), path, id)
    }

    /// The mode exactly as stored.
    pub fn mode(&self) -> &[u8] {
        &self.mode
    }

    /// The mode zero-padded to six characters, as shown by listings.
    pub fn display_mode(&self) -> String {
        format!("{:0>6}", String::from_utf8_lossy(&self.mode))
    }

    /// Interpret the stored mode. Returns `None` for unrecognized modes.
    pub fn file_mode(&self) -> Option<FileMode> {
        FileMode::from_octal_slice(&self.mode)
    }

    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

/// A parsed tree object.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Tree {
        Tree::default()
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. No sorting is performed here.
    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    /// Reorder entries according to `ordering`.
    ///
    /// The sort is stable, so `Preserve` and already-sorted trees are untouched.
    pub fn sort(&mut self, ordering: TreeOrdering) {
        if ordering == TreeOrdering::Canonical {
            self.entries.sort_by(canonical_cmp);
        }
    }
}

impl From<Vec<TreeEntry>> for Tree {
    fn from(entries: Vec<TreeEntry>) -> Tree {
        Tree { entries }
    }
}

impl ObjectData for Tree {
    const KIND: Kind = Kind::Tree;

    fn serialize(&self) -> Vec<u8> {
        let mut r = Vec::new();

        for entry in &self.entries {
            r.extend_from_slice(&entry.mode);
            r.push(b' ');
            r.extend_from_slice(&entry.path);
            r.push(0);
            r.extend_from_slice(entry.id.as_bytes());
        }

        r
    }

    fn deserialize(data: &[u8]) -> Result<Tree> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < data.len() {
            let spc = parse_utils::find_from(data, pos, b' ')
                .ok_or_else(|| malformed(pos, "no space after mode"))?;

            let mode = &data[pos..spc];
            check_mode(mode)?;

            let nul = parse_utils::find_from(data, spc + 1, 0)
                .ok_or_else(|| malformed(pos, "path is not NUL-terminated"))?;
            let path = &data[spc + 1..nul];

            let raw_id = data
                .get(nul + 1..nul + 21)
                .ok_or_else(|| malformed(pos, "truncated object ID"))?;

            entries.push(TreeEntry {
                mode: mode.to_vec(),
                path: path.to_vec(),
                id: Id::new(raw_id)?,
            });

            pos = nul + 21;
        }

        Ok(Tree { entries })
    }
}

fn check_mode(mode: &[u8]) -> Result<()> {
    if mode.len() != 5 && mode.len() != 6 {
        return Err(Error::MalformedTree(format!(
            "mode `{}` is {} bytes, expected 5 or 6",
            String::from_utf8_lossy(mode),
            mode.len()
        )));
    }
    if !mode.iter().all(u8::is_ascii_digit) {
        return Err(Error::MalformedTree(format!(
            "mode `{}` is not numeric",
            String::from_utf8_lossy(mode)
        )));
    }
    Ok(())
}

fn malformed(offset: usize, reason: &str) -> Error {
    Error::MalformedTree(format!("entry at byte {}: {}", offset, reason))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn raw_entry() -> impl Strategy<Value = (String, Vec<u8>, [u8; 20])> {
        let path_byte = any::<u8>().prop_filter("NUL ends a path", |b| *b != 0);
        (
            "[0-9]{5,6}",
            prop::collection::vec(path_byte, 1..40),
            any::<[u8; 20]>(),
        )
    }

    proptest! {
        /// Any well-formed entry sequence parses to one entry per record
        /// and serializes back to the same bytes.
        #[test]
        fn prop_parse_serialize_round_trip(entries in prop::collection::vec(raw_entry(), 0..16)) {
            let mut raw = Vec::new();
            for (mode, path, id) in &entries {
                raw.extend_from_slice(mode.as_bytes());
                raw.push(b' ');
                raw.extend_from_slice(path);
                raw.push(0);
                raw.extend_from_slice(id);
            }

            let tree = Tree::deserialize(&raw).unwrap();

            prop_assert_eq!(tree.len(), entries.len());
            for (entry, (mode, path, id)) in tree.entries().iter().zip(&entries) {
                prop_assert_eq!(entry.mode(), mode.as_bytes());
                prop_assert_eq!(entry.path(), path.as_slice());
                let entry_id = entry.id();
                prop_assert_eq!(entry_id.as_bytes(), id);
            }
            prop_assert_eq!(tree.serialize(), raw);
        }

        /// Canonical sorting is independent of insertion order.
        #[test]
        fn prop_canonical_order_is_stable(
            names in prop::collection::btree_set("[a-z.\\-]{1,6}", 1..10),
            seed in any::<u64>(),
        ) {
            let id = Id::from_raw([7; 20]);
            let entries: Vec<TreeEntry> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let mode = if i % 2 == 0 { "100644" } else { "40000" };
                    TreeEntry::new(mode, name.as_str(), id).unwrap()
                })
                .collect();

            let mut rotated = entries.clone();
            let n = rotated.len();
            rotated.rotate_left((seed % n as u64) as usize);
            rotated.reverse();

            let mut a = Tree::from(entries);
            let mut b = Tree::from(rotated);
            a.sort(TreeOrdering::Canonical);
            b.sort(TreeOrdering::Canonical);

            prop_assert_eq!(a.serialize(), b.serialize());
        }
    }
}
