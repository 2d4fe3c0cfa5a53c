use std::fmt::{self, Display, Formatter};

use crate::{Error, Result};

/// Describes the fundamental git object type (blob, tree, commit, or tag).
/// We use the word `kind` here to avoid conflict with the Rust reserved word `type`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl Kind {
    /// Parse the type tag found at the start of a stored object record.
    pub fn from_tag(tag: &[u8]) -> Result<Kind> {
        match tag {
            b"blob" => Ok(Kind::Blob),
            b"tree" => Ok(Kind::Tree),
            b"commit" => Ok(Kind::Commit),
            b"tag" => Ok(Kind::Tag),
            _ => Err(Error::UnknownObjectKind(
                String::from_utf8_lossy(tag).into_owned(),
            )),
        }
    }

    /// Return the type tag as written in the object record header.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
            Kind::Tag => "tag",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
