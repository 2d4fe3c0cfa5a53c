use super::{Kind, ObjectData};
use crate::Result;

/// File content. Blob payloads are opaque bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Blob {
        Blob { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl ObjectData for Blob {
    const KIND: Kind = Kind::Blob;

    fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn deserialize(data: &[u8]) -> Result<Blob> {
        Ok(Blob::new(data.to_vec()))
    }
}
