use std::fmt::{self, Write};
use std::str::FromStr;

use thiserror::Error;

/// An error which can be returned when parsing a git object ID.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseIdError {
    /// Value being parsed is empty.
    #[error("cannot parse object ID from empty string")]
    Empty,

    /// Contains an invalid digit.
    ///
    /// Among other causes, this variant will be constructed when parsing a string that
    /// contains a letter beyond `f`.
    #[error("value contains invalid digit `{0}`")]
    InvalidDigit(char),

    /// ID string is too long.
    #[error("value is more than 40 digits long")]
    Overflow,

    /// ID string is too short.
    #[error("value is less than 40 digits long")]
    Underflow,
}

/// An object ID is the SHA-1 hash of an object's canonical record.
/// It is stored as a 20-byte signature, but is usually shown as 40 hex digits.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id([u8; 20]);

impl Id {
    /// Create a new ID from a 20-byte raw slice, as found in tree entries.
    ///
    /// It is an error if the slice contains anything other than 20 bytes.
    pub fn new(id: &[u8]) -> Result<Id, ParseIdError> {
        match id.len() {
            20 => {
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(id);
                Ok(Id(bytes))
            }
            0 => Err(ParseIdError::Empty),
            n if n < 20 => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    pub(crate) fn from_raw(bytes: [u8; 20]) -> Id {
        Id(bytes)
    }

    /// Convert a 40-character hex ID to an object ID.
    ///
    /// Upper-case digits are accepted; the ID always displays in lower case.
    pub fn from_hex<T: AsRef<[u8]>>(id: T) -> Result<Id, ParseIdError> {
        let hex = id.as_ref();

        match hex.len() {
            40 => {
                let mut bytes = [0u8; 20];
                for (byte, pair) in bytes.iter_mut().zip(hex.chunks(2)) {
                    *byte = digit_value(pair[0])? << 4 | digit_value(pair[1])?;
                }
                Ok(Id(bytes))
            }
            0 => Err(ParseIdError::Empty),
            n if n < 40 => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Return the raw 20-byte form of this ID.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::from_hex(s.as_bytes())
    }
}

static CHARS: &[u8] = b"0123456789abcdef";

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0.iter() {
            f.write_char(CHARS[(byte >> 4) as usize].into())?;
            f.write_char(CHARS[(byte & 0xf) as usize].into())?;
        }

        Ok(())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

/// Returns true if `s` consists only of hex digits (either case).
pub(crate) fn is_hex(s: &[u8]) -> bool {
    s.iter().all(|c| c.is_ascii_hexdigit())
}

fn digit_value(c: u8) -> Result<u8, ParseIdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ParseIdError::InvalidDigit(c as char)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_bytes() {
        let raw = [
            0xceu8, 0x01, 0x36, 0x25, 0x03, 0x0b, 0xa8, 0xdb, 0xa9, 0x06, 0xf7, 0x56, 0x96, 0x7f,
            0x9e, 0x9c, 0xa3, 0x94, 0x46, 0x4a,
        ];
        let id = Id::new(&raw).unwrap();
        assert_eq!(id.to_string(), "ce013625030ba8dba906f756967f9e9ca394464a");
        assert_eq!(id.as_bytes(), &raw);
    }

    #[test]
    fn from_raw_bytes_wrong_length() {
        assert_eq!(Id::new(&[]).unwrap_err(), ParseIdError::Empty);
        assert_eq!(Id::new(&[1; 19]).unwrap_err(), ParseIdError::Underflow);
        assert_eq!(Id::new(&[1; 21]).unwrap_err(), ParseIdError::Overflow);
    }

    #[test]
    fn from_hex() {
        let id = Id::from_hex("3cd9329ac53613a0bfa198ae28f3af957e49573c").unwrap();
        assert_eq!(id.to_string(), "3cd9329ac53613a0bfa198ae28f3af957e49573c");
    }

    #[test]
    fn from_hex_upper_case_prints_lower() {
        let id = Id::from_hex("3CD9329AC53613A0BFA198AE28F3AF957E49573C").unwrap();
        assert_eq!(id.to_string(), "3cd9329ac53613a0bfa198ae28f3af957e49573c");
    }

    #[test]
    fn from_str_errors() {
        assert_eq!("".parse::<Id>().unwrap_err(), ParseIdError::Empty);
        assert_eq!(
            "3cd9329ac53613a0bfa198ae28f3af957e49573".parse::<Id>().unwrap_err(),
            ParseIdError::Underflow
        );
        assert_eq!(
            "3cd9329ac53613a0bfa198ae28f3af957e49573c0"
                .parse::<Id>()
                .unwrap_err(),
            ParseIdError::Overflow
        );
        assert_eq!(
            "3cd9329ac53613a0bfa198ae28f3af957e49573g"
                .parse::<Id>()
                .unwrap_err(),
            ParseIdError::InvalidDigit('g')
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ParseIdError::InvalidDigit('x').to_string(),
            "value contains invalid digit `x`"
        );
        assert_eq!(
            ParseIdError::Underflow.to_string(),
            "value is less than 40 digits long"
        );
    }

    #[test]
    fn hex_check() {
        assert!(is_hex(b"0123456789abcdefABCDEF"));
        assert!(!is_hex(b"abcg"));
        assert!(!is_hex(b"HEAD"));
    }
}
