/// Describes the file type of a tree entry.
///
/// Git uses a variation on the Unix file permissions flags to denote a file's
/// intended type on disk. The following values are recognized:
///
/// * `0o100644` - normal file
/// * `0o100755` - executable file
/// * `0o120000` - symbolic link
/// * `0o040000` - tree (subdirectory)
/// * `0o160000` - submodule (aka gitlink)
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileMode {
    Normal,
    Executable,
    SymbolicLink,
    Tree,
    Submodule,
}

impl FileMode {
    /// Convert from git file-mode integer to `FileMode` enum.
    ///
    /// Returns `None` if the value is not one of the recognized constants.
    pub fn from_value(value: u32) -> Option<FileMode> {
        match value {
            0o100644 => Some(FileMode::Normal),
            0o100755 => Some(FileMode::Executable),
            0o120000 => Some(FileMode::SymbolicLink),
            0o040000 => Some(FileMode::Tree),
            0o160000 => Some(FileMode::Submodule),
            _ => None,
        }
    }

    /// Parse the ASCII octal mode as stored in a tree entry (`100644`, `40000`, ...).
    pub fn from_octal_slice(mode: &[u8]) -> Option<FileMode> {
        if mode.is_empty() || mode.len() > 6 {
            return None;
        }

        let mut value = 0u32;
        for &c in mode {
            match c {
                b'0'..=b'7' => value = value << 3 | u32::from(c - b'0'),
                _ => return None,
            }
        }

        FileMode::from_value(value)
    }

    /// Convert from `FileMode` enum to git file-mode integer.
    pub fn to_value(self) -> u32 {
        match self {
            FileMode::Normal => 0o100644,
            FileMode::Executable => 0o100755,
            FileMode::SymbolicLink => 0o120000,
            FileMode::Tree => 0o040000,
            FileMode::Submodule => 0o160000,
        }
    }

    /// The mode string git itself writes into tree objects.
    ///
    /// Note that trees are written without a leading zero.
    pub fn as_octal_str(self) -> &'static str {
        match self {
            FileMode::Normal => "100644",
            FileMode::Executable => "100755",
            FileMode::SymbolicLink => "120000",
            FileMode::Tree => "40000",
            FileMode::Submodule => "160000",
        }
    }
}
