use std::cmp::{self, Ordering};

use super::{FileMode, TreeEntry};

/// Policy for the order of entries when a tree is written.
///
/// `Preserve` keeps entries in the order they were added or parsed, so a
/// parsed tree serializes back to identical bytes. `Canonical` applies the
/// order command-line git requires, which makes the same directory contents
/// hash identically regardless of insertion order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TreeOrdering {
    Preserve,
    Canonical,
}

impl Default for TreeOrdering {
    fn default() -> Self {
        TreeOrdering::Preserve
    }
}

/// Compare two tree entries by git's canonical rule.
///
/// Paths are compared byte-wise, except that trees are sorted as though
/// their name ends with `/`. So `foo.txt` sorts before the tree `foo`
/// (`.` < `/`), but the file `foo` sorts before `foo.txt`. A file and a
/// tree with the same name order the file first.
pub fn canonical_cmp(left: &TreeEntry, right: &TreeEntry) -> Ordering {
    compare_names(
        left.path(),
        left.file_mode() == Some(FileMode::Tree),
        right.path(),
        right.file_mode() == Some(FileMode::Tree),
    )
}

fn compare_names(left: &[u8], left_is_tree: bool, right: &[u8], right_is_tree: bool) -> Ordering {
    let l = cmp::min(left.len(), right.len());

    match left[..l].cmp(&right[..l]) {
        Ordering::Equal => (),
        non_eq => return non_eq,
    }

    let lsuffix = suffix_or_slash(&left[l..], left_is_tree);
    let rsuffix = suffix_or_slash(&right[l..], right_is_tree);

    lsuffix.cmp(rsuffix)
}

const SLASH: [u8; 1] = [b'/'];

fn suffix_or_slash(suffix: &[u8], is_tree: bool) -> &[u8] {
    if !suffix.is_empty() || !is_tree {
        suffix
    } else {
        &SLASH
    }
}
