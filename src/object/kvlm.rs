//! Key-value list with message: the text grammar shared by commit and tag objects.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL
//!  -----END PGP SIGNATURE-----
//!
//! Create first draft
//! ```
//!
//! Each header is `key SP value LF`. A value continues onto the next line
//! when that line starts with a single space, which is not part of the value.
//! The first empty line ends the headers; everything after it is the message.

use std::slice;

use super::parse_utils;
use crate::{Error, Result};

/// The value(s) stored under a single header key.
///
/// Most keys appear once. Keys such as `parent` on a merge commit repeat,
/// in which case every occurrence is kept in the order encountered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Single(Vec<u8>),
    Multi(Vec<Vec<u8>>),
}

impl Value {
    /// Return every occurrence of this value in encounter order.
    pub fn as_slice(&self) -> &[Vec<u8>] {
        match self {
            Value::Single(v) => slice::from_ref(v),
            Value::Multi(vs) => vs.as_slice(),
        }
    }

    /// Return the first occurrence of this value.
    pub fn first(&self) -> Option<&[u8]> {
        self.as_slice().first().map(|v| v.as_slice())
    }

    /// Return true if the key was repeated.
    pub fn is_multi(&self) -> bool {
        matches!(self, Value::Multi(_))
    }

    fn push(&mut self, value: Vec<u8>) {
        match self {
            Value::Single(first) => {
                let first = std::mem::take(first);
                *self = Value::Multi(vec![first, value]);
            }
            Value::Multi(vs) => vs.push(value),
        }
    }
}

/// Ordered headers plus a trailing free-text message.
///
/// Keys keep their first-seen order so that `serialize` reproduces the
/// parsed bytes exactly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Kvlm {
    headers: Vec<(Vec<u8>, Value)>,
    message: Vec<u8>,
}

impl Kvlm {
    /// Create an empty header list with an empty message.
    pub fn new() -> Kvlm {
        Kvlm::default()
    }

    /// Parse a raw commit or tag payload.
    pub fn parse(raw: &[u8]) -> Result<Kvlm> {
        let mut kvlm = Kvlm::new();
        let mut start = 0;

        loop {
            let nl = parse_utils::find_from(raw, start, b'\n')
                .ok_or_else(|| malformed("missing blank line before message"))?;

            if nl == start {
                kvlm.message = raw[start + 1..].to_vec();
                return Ok(kvlm);
            }

            if raw[start] == b' ' {
                return Err(malformed("continuation line without a header"));
            }

            let spc = match parse_utils::find_from(raw, start, b' ') {
                Some(spc) if spc < nl => spc,
                _ => return Err(malformed("header line has no value")),
            };

            let mut end = nl;
            while raw.get(end + 1) == Some(&b' ') {
                end = parse_utils::find_from(raw, end + 1, b'\n')
                    .ok_or_else(|| malformed("unterminated continuation line"))?;
            }

            let key = &raw[start..spc];
            kvlm.push(key, unfold(&raw[spc + 1..end]))?;

            start = end + 1;
        }
    }

    /// Produce the exact byte form that `parse` accepts.
    pub fn serialize(&self) -> Vec<u8> {
        let mut r = Vec::new();

        for (key, value) in &self.headers {
            for v in value.as_slice() {
                r.extend_from_slice(key);
                r.push(b' ');
                fold_into(&mut r, v);
                r.push(b'\n');
            }
        }

        r.push(b'\n');
        r.extend_from_slice(&self.message);
        r
    }

    /// Look up the value(s) stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.headers
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v)
    }

    /// Return the first value stored under `key`.
    pub fn first(&self, key: &[u8]) -> Option<&[u8]> {
        self.get(key).and_then(Value::first)
    }

    /// Return every value stored under `key`; empty if the key is absent.
    pub fn all(&self, key: &[u8]) -> &[Vec<u8>] {
        match self.get(key) {
            Some(value) => value.as_slice(),
            None => &[],
        }
    }

    /// Append a header. Repeating a key turns its value into a list.
    ///
    /// Keys must be non-empty and contain no space or newline, since
    /// those could not be parsed back. Values may hold any bytes.
    pub fn push<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: Into<Vec<u8>>,
    {
        let key = key.as_ref();
        check_key(key)?;
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| k.as_slice() == key) {
            Some((_, existing)) => existing.push(value),
            None => self.headers.push((key.to_vec(), Value::Single(value))),
        }

        Ok(())
    }

    /// Iterate over headers in their original order.
    pub fn headers(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.headers.iter().map(|(k, v)| (k.as_slice(), v))
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn set_message<M: Into<Vec<u8>>>(&mut self, message: M) {
        self.message = message.into();
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedCommit(reason.to_string())
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(malformed("empty header key"));
    }
    if key.iter().any(|&b| b == b' ' || b == b'\n') {
        return Err(Error::MalformedCommit(format!(
            "header key `{}` contains a space or newline",
            String::from_utf8_lossy(key).escape_debug()
        )));
    }
    Ok(())
}

// Drop the leading space of each continuation line.
fn unfold(folded: &[u8]) -> Vec<u8> {
    let mut r = Vec::with_capacity(folded.len());
    let mut after_newline = false;

    for &b in folded {
        if after_newline && b == b' ' {
            after_newline = false;
            continue;
        }
        after_newline = b == b'\n';
        r.push(b);
    }

    r
}

fn fold_into(r: &mut Vec<u8>, value: &[u8]) {
    for &b in value {
        r.push(b);
        if b == b'\n' {
            r.push(b' ');
        }
    }
}
