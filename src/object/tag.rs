use super::commit::header_id;
use super::{Id, Kind, Kvlm, ObjectData};
use crate::{Error, Result};

/// An annotated tag object.
///
/// Lightweight tags are plain references and never appear as objects.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    kvlm: Kvlm,
    object: Id,
}

impl Tag {
    /// Wrap parsed headers, checking that the `object` header holds an object ID.
    pub fn from_kvlm(kvlm: Kvlm) -> Result<Tag> {
        let object = match kvlm.first(b"object") {
            Some(object) => header_id(b"object", object)?,
            None => return Err(Error::MalformedCommit("missing object header".to_string())),
        };

        Ok(Tag { kvlm, object })
    }

    /// The tagged object.
    pub fn object(&self) -> Id {
        self.object
    }

    /// The kind named by the `type` header, if present and recognized.
    pub fn target_kind(&self) -> Option<Kind> {
        self.kvlm
            .first(b"type")
            .and_then(|t| Kind::from_tag(t).ok())
    }

    /// The tag's name, from the `tag` header.
    pub fn name(&self) -> Option<&[u8]> {
        self.kvlm.first(b"tag")
    }

    pub fn tagger(&self) -> Option<&[u8]> {
        self.kvlm.first(b"tagger")
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}

impl ObjectData for Tag {
    const KIND: Kind = Kind::Tag;

    fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    fn deserialize(data: &[u8]) -> Result<Tag> {
        Tag::from_kvlm(Kvlm::parse(data)?)
    }
}
