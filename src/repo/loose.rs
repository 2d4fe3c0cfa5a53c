//! Loose objects: one zlib-compressed file per object under
//! `objects/<first 2 hex digits>/<remaining 38 hex digits>`.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use flate2::{read::ZlibDecoder, write::ZlibEncoder};
use tempfile::NamedTempFile;
use tracing::debug;

use super::Repo;
use crate::object::{self, parse_utils, Id, Kind, Object, ObjectData};
use crate::{Error, Result};

impl Repo {
    /// Return the path where the object with the given ID is stored.
    pub fn object_path(&self, id: Id) -> PathBuf {
        let hex = id.to_string();
        self.bucket_dir(&hex[..2]).join(&hex[2..])
    }

    pub(crate) fn bucket_dir(&self, prefix: &str) -> PathBuf {
        self.git_dir.join("objects").join(prefix)
    }

    /// Store `payload` as an object of the given kind and return its ID.
    ///
    /// In dry-run mode, nothing is written but the ID is still returned.
    /// Writing an object that is already stored leaves the existing file alone.
    pub fn write_raw(&self, kind: Kind, payload: &[u8]) -> Result<Id> {
        let id = object::hash(kind, payload);

        if self.options.is_dry_run() {
            debug!(%id, %kind, "dry run, object not written");
            return Ok(id);
        }

        let path = self.object_path(id);
        if path.is_file() {
            debug!(%id, %kind, "object already stored");
            return Ok(id);
        }

        let hex = id.to_string();
        let dir = self.bucket_dir(&hex[..2]);

        // Another writer may create the bucket at the same time; that's fine.
        fs::create_dir_all(&dir)?;

        let temp = NamedTempFile::new_in(&dir)?;
        let mut encoder = ZlibEncoder::new(temp, self.options.compression());
        encoder.write_all(&object::record(kind, payload))?;
        let temp = encoder.finish()?;
        temp.persist(&path).map_err(|e| e.error)?;

        debug!(%id, %kind, len = payload.len(), "wrote object");
        Ok(id)
    }

    /// Serialize and store an object.
    ///
    /// Trees are reordered first according to the repo's tree ordering policy.
    pub fn write_object(&self, object: &Object) -> Result<Id> {
        match object {
            Object::Tree(tree) => {
                let mut tree = tree.clone();
                tree.sort(self.options.tree_ordering());
                self.write_raw(Kind::Tree, &tree.serialize())
            }
            _ => self.write_raw(object.kind(), &object.serialize()),
        }
    }

    /// Read and decompress an object, returning its kind and payload.
    pub fn read_raw(&self, id: Id) -> Result<(Kind, Vec<u8>)> {
        let path = self.object_path(id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        let mut raw = Vec::new();
        ZlibDecoder::new(BufReader::new(file))
            .read_to_end(&mut raw)
            .map_err(|err| malformed(id, format!("can't decompress: {}", err)))?;

        let (kind, payload) = parse_record(id, raw)?;
        debug!(%id, %kind, len = payload.len(), "read object");
        Ok((kind, payload))
    }

    /// Read an object and parse it according to its kind.
    pub fn read_object(&self, id: Id) -> Result<Object> {
        let (kind, payload) = self.read_raw(id)?;
        Object::deserialize(kind, &payload)
    }

    /// Read an object that must be of kind `T::KIND`.
    pub fn read_as<T: ObjectData>(&self, id: Id) -> Result<T> {
        let (kind, payload) = self.read_raw(id)?;
        if kind != T::KIND {
            return Err(Error::UnexpectedKind {
                id,
                expected: T::KIND,
                found: kind,
            });
        }
        T::deserialize(&payload)
    }
}

fn malformed(id: Id, reason: String) -> Error {
    Error::MalformedObject { id, reason }
}

// Split `<kind> SP <decimal length> NUL <payload>`, checking the length.
fn parse_record(id: Id, mut raw: Vec<u8>) -> Result<(Kind, Vec<u8>)> {
    let spc = parse_utils::find_from(&raw, 0, b' ')
        .ok_or_else(|| malformed(id, "no space after object kind".to_string()))?;
    let nul = parse_utils::find_from(&raw, spc + 1, 0)
        .ok_or_else(|| malformed(id, "no NUL after object length".to_string()))?;

    let len_digits = &raw[spc + 1..nul];
    if len_digits.is_empty() || !len_digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed(
            id,
            format!("bad length `{}`", String::from_utf8_lossy(len_digits)),
        ));
    }

    let actual = raw.len() - nul - 1;
    let declared = String::from_utf8_lossy(len_digits).parse::<usize>().ok();
    if declared != Some(actual) {
        return Err(malformed(
            id,
            format!(
                "bad length: header says {}, payload is {} bytes",
                String::from_utf8_lossy(len_digits),
                actual
            ),
        ));
    }

    let kind = Kind::from_tag(&raw[..spc])?;
    let payload = raw.split_off(nul + 1);
    Ok((kind, payload))
}
