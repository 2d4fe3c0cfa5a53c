//! Represents the git concept of an "object" which is a tuple of
//! object type and binary data identified by the hash of the binary data.

use sha1::{Digest, Sha1};

use crate::Result;

mod blob;
pub use blob::Blob;

mod commit;
pub use commit::Commit;

mod id;
pub use id::{Id, ParseIdError};
pub(crate) use id::is_hex;

mod kind;
pub use kind::Kind;

pub mod kvlm;
pub use kvlm::Kvlm;

pub(crate) mod parse_utils;

mod tag;
pub use tag::Tag;

pub mod tree;
pub use tree::{FileMode, Tree, TreeEntry, TreeOrdering};

/// Conversion between an object's payload bytes and its parsed form.
///
/// The payload is the part of the stored record after the `<kind> <len>\0`
/// header. Compression and hashing are not this trait's concern.
pub trait ObjectData: Sized {
    /// The kind tag written for this type.
    const KIND: Kind;

    fn serialize(&self) -> Vec<u8>;

    fn deserialize(data: &[u8]) -> Result<Self>;
}

/// A parsed object of any kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Parse `data` as a payload of the given kind.
    pub fn deserialize(kind: Kind, data: &[u8]) -> Result<Object> {
        Ok(match kind {
            Kind::Blob => Object::Blob(Blob::deserialize(data)?),
            Kind::Tree => Object::Tree(Tree::deserialize(data)?),
            Kind::Commit => Object::Commit(Commit::deserialize(data)?),
            Kind::Tag => Object::Tag(Tag::deserialize(data)?),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(b) => b.serialize(),
            Object::Tree(t) => t.serialize(),
            Object::Commit(c) => c.serialize(),
            Object::Tag(t) => t.serialize(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
            Object::Commit(_) => Kind::Commit,
            Object::Tag(_) => Kind::Tag,
        }
    }

    /// Computes the object's ID from its serialized form.
    pub fn id(&self) -> Id {
        hash(self.kind(), &self.serialize())
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Object::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Object::Tree(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Object::Commit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Object::Tag(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(b: Blob) -> Object {
        Object::Blob(b)
    }
}

impl From<Tree> for Object {
    fn from(t: Tree) -> Object {
        Object::Tree(t)
    }
}

impl From<Commit> for Object {
    fn from(c: Commit) -> Object {
        Object::Commit(c)
    }
}

impl From<Tag> for Object {
    fn from(t: Tag) -> Object {
        Object::Tag(t)
    }
}

/// Computes an object ID from the payload and kind.
///
/// This is functionally equivalent to the
/// [`git hash-object`](https://git-scm.com/docs/git-hash-object) command
/// without the `-w` option that would write the object to the repo.
pub fn hash(kind: Kind, payload: &[u8]) -> Id {
    let mut hasher = Sha1::new();

    hasher.update(kind.as_str());
    hasher.update(b" ");
    hasher.update(payload.len().to_string());
    hasher.update(b"\0");
    hasher.update(payload);

    let digest = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(digest.as_slice());
    Id::from_raw(bytes)
}

/// Builds the canonical `<kind> <len>\0<payload>` record.
pub(crate) fn record(kind: Kind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, payload.len());

    let mut r = Vec::with_capacity(header.len() + payload.len());
    r.extend_from_slice(header.as_bytes());
    r.extend_from_slice(payload);
    r
}
