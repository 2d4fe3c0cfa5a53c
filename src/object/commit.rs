use super::{Id, Kind, Kvlm, ObjectData};
use crate::{Error, Result};

/// A commit: headers naming a tree and zero or more parents, plus a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    kvlm: Kvlm,
    tree: Id,
    parents: Vec<Id>,
}

impl Commit {
    /// Wrap parsed headers, checking that `tree` and any `parent` headers
    /// hold object IDs.
    pub fn from_kvlm(kvlm: Kvlm) -> Result<Commit> {
        let tree = match kvlm.first(b"tree") {
            Some(tree) => header_id(b"tree", tree)?,
            None => return Err(Error::MalformedCommit("missing tree header".to_string())),
        };

        let parents = kvlm
            .all(b"parent")
            .iter()
            .map(|p| header_id(b"parent", p))
            .collect::<Result<Vec<Id>>>()?;

        Ok(Commit {
            kvlm,
            tree,
            parents,
        })
    }

    /// The tree this commit records.
    pub fn tree(&self) -> Id {
        self.tree
    }

    /// Parent commits: empty for a root commit, several for a merge.
    pub fn parents(&self) -> &[Id] {
        &self.parents
    }

    pub fn author(&self) -> Option<&[u8]> {
        self.kvlm.first(b"author")
    }

    pub fn committer(&self) -> Option<&[u8]> {
        self.kvlm.first(b"committer")
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}

impl ObjectData for Commit {
    const KIND: Kind = Kind::Commit;

    fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    fn deserialize(data: &[u8]) -> Result<Commit> {
        Commit::from_kvlm(Kvlm::parse(data)?)
    }
}

/// Parse a header value that must be a 40-digit object ID.
pub(crate) fn header_id(key: &[u8], value: &[u8]) -> Result<Id> {
    Id::from_hex(value).map_err(|err| {
        Error::MalformedCommit(format!(
            "{} header `{}`: {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value),
            err
        ))
    })
}
