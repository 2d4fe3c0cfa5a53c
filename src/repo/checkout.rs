use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::Repo;
use crate::object::{FileMode, Id, Kind, Object, Tree, TreeEntry};
use crate::{Error, Result};

impl Repo {
    /// Write the contents of a tree (or of a commit's tree) into `target`.
    ///
    /// `target` must not exist yet, or be an empty directory. Nothing is
    /// rolled back on failure: whatever was written before the error stays.
    pub fn checkout(&self, id: Id, target: &Path) -> Result<()> {
        let tree = match self.read_object(id)? {
            Object::Tree(tree) => tree,
            Object::Commit(commit) => self.read_as::<Tree>(commit.tree())?,
            other => {
                return Err(Error::UnexpectedKind {
                    id,
                    expected: Kind::Tree,
                    found: other.kind(),
                })
            }
        };

        prepare_target(target)?;
        debug!(%id, target = %target.display(), "checking out");

        let mut pending = vec![(tree, target.to_path_buf())];

        while let Some((tree, dir)) = pending.pop() {
            for entry in tree.entries() {
                let dest = dir.join(file_name(entry)?);

                if entry.file_mode() == Some(FileMode::Submodule) {
                    warn!(id = %entry.id(), path = %dest.display(), "gitlink not checked out");
                    fs::create_dir(&dest)?;
                    continue;
                }

                match self.read_object(entry.id())? {
                    Object::Tree(subtree) => {
                        fs::create_dir(&dest)?;
                        pending.push((subtree, dest));
                    }
                    Object::Blob(blob) => {
                        fs::write(&dest, blob.data())?;
                        if entry.file_mode() == Some(FileMode::Executable) {
                            set_executable(&dest)?;
                        }
                        trace!(id = %entry.id(), path = %dest.display(), "wrote file");
                    }
                    other => {
                        return Err(Error::UnexpectedKind {
                            id: entry.id(),
                            expected: Kind::Blob,
                            found: other.kind(),
                        })
                    }
                }
            }
        }

        Ok(())
    }
}

fn prepare_target(target: &Path) -> Result<()> {
    match fs::metadata(target) {
        Ok(m) => {
            if !m.is_dir() {
                return Err(Error::CheckoutTargetNotDirectory(target.to_path_buf()));
            }
            if fs::read_dir(target)?.next().is_some() {
                return Err(Error::CheckoutTargetNotEmpty(target.to_path_buf()));
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(target)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

// An entry's path must be a single, ordinary path component.
fn file_name(entry: &TreeEntry) -> Result<PathBuf> {
    let path = entry.path();

    if path.is_empty() || path == b"." || path == b".." || path.contains(&b'/') || path.contains(&0)
    {
        return Err(Error::MalformedTree(format!(
            "refusing to check out path `{}`",
            String::from_utf8_lossy(path)
        )));
    }

    bytes_to_path(path)
}

#[cfg(unix)]
fn bytes_to_path(path: &[u8]) -> Result<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Ok(PathBuf::from(OsStr::from_bytes(path)))
}

#[cfg(not(unix))]
fn bytes_to_path(path: &[u8]) -> Result<PathBuf> {
    match std::str::from_utf8(path) {
        Ok(s) => Ok(PathBuf::from(s)),
        Err(_) => Err(Error::MalformedTree(format!(
            "path `{}` is not valid UTF-8",
            String::from_utf8_lossy(path)
        ))),
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::object::{ObjectData, TreeEntry};
    use crate::test_support::TempRepo;

    fn tree_of(tr: &TempRepo, entries: Vec<TreeEntry>) -> Id {
        tr.write(Kind::Tree, &Tree::from(entries).serialize())
    }

    #[test]
    fn nested_tree() {
        let tr = TempRepo::new();
        let hello = tr.write(Kind::Blob, b"hello\n");
        let script = tr.write(Kind::Blob, b"#!/bin/sh\n");

        let sub = tree_of(
            &tr,
            vec![TreeEntry::new("100755", "run.sh", script).unwrap()],
        );
        let root = tree_of(
            &tr,
            vec![
                TreeEntry::new("100644", "a.txt", hello).unwrap(),
                TreeEntry::new("40000", "bin", sub).unwrap(),
            ],
        );

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("wt");
        tr.repo().checkout(root, &target).unwrap();

        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"hello\n");
        assert_eq!(
            fs::read(target.join("bin/run.sh")).unwrap(),
            b"#!/bin/sh\n"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(target.join("bin/run.sh"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn commit_uses_its_tree() {
        let tr = TempRepo::new();
        let hello = tr.write(Kind::Blob, b"hello\n");
        let root = tree_of(&tr, vec![TreeEntry::new("100644", "a.txt", hello).unwrap()]);
        let commit = tr.write(
            Kind::Commit,
            format!("tree {}\n\ninitial\n", root).as_bytes(),
        );

        let out = tempfile::tempdir().unwrap();
        tr.repo().checkout(commit, out.path()).unwrap();

        assert_eq!(fs::read(out.path().join("a.txt")).unwrap(), b"hello\n");
    }

    #[test]
    fn blob_is_not_checkable() {
        let tr = TempRepo::new();
        let hello = tr.write(Kind::Blob, b"hello\n");

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("wt");

        match tr.repo().checkout(hello, &target).unwrap_err() {
            Error::UnexpectedKind { found, .. } => assert_eq!(found, Kind::Blob),
            err => panic!("wrong error: {:?}", err),
        }
        assert!(!target.exists());
    }

    #[test]
    fn target_not_empty() {
        let tr = TempRepo::new();
        let root = tr.write(Kind::Tree, b"");

        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("existing"), "x").unwrap();

        match tr.repo().checkout(root, out.path()).unwrap_err() {
            Error::CheckoutTargetNotEmpty(path) => assert_eq!(path, out.path()),
            err => panic!("wrong error: {:?}", err),
        }
    }

    #[test]
    fn target_not_directory() {
        let tr = TempRepo::new();
        let root = tr.write(Kind::Tree, b"");

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("file");
        fs::write(&target, "x").unwrap();

        match tr.repo().checkout(root, &target).unwrap_err() {
            Error::CheckoutTargetNotDirectory(path) => assert_eq!(path, target),
            err => panic!("wrong error: {:?}", err),
        }
    }

    #[test]
    fn gitlink_becomes_empty_dir() {
        let tr = TempRepo::new();
        let elsewhere = Id::from_hex("3cd9329ac53613a0bfa198ae28f3af957e49573c").unwrap();
        let root = tree_of(
            &tr,
            vec![TreeEntry::new("160000", "vendor", elsewhere).unwrap()],
        );

        let out = tempfile::tempdir().unwrap();
        tr.repo().checkout(root, out.path()).unwrap();

        let vendor = out.path().join("vendor");
        assert!(vendor.is_dir());
        assert_eq!(fs::read_dir(vendor).unwrap().count(), 0);
    }

    #[test]
    fn refuses_parent_dir_entry() {
        let tr = TempRepo::new();
        let hello = tr.write(Kind::Blob, b"hello\n");

        let mut raw = b"100644 ..\0".to_vec();
        raw.extend_from_slice(hello.as_bytes());
        let root = tr.write(Kind::Tree, &raw);

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("wt");

        match tr.repo().checkout(root, &target).unwrap_err() {
            Error::MalformedTree(_) => (),
            err => panic!("wrong error: {:?}", err),
        }
        assert!(!out.path().join("..").join("hello").exists());
    }

    #[test]
    fn missing_blob_leaves_partial_tree() {
        let tr = TempRepo::new();
        let hello = tr.write(Kind::Blob, b"hello\n");
        let missing = Id::from_hex("3cd9329ac53613a0bfa198ae28f3af957e49573c").unwrap();
        let root = tree_of(
            &tr,
            vec![
                TreeEntry::new("100644", "a.txt", hello).unwrap(),
                TreeEntry::new("100644", "b.txt", missing).unwrap(),
            ],
        );

        let out = tempfile::tempdir().unwrap();
        match tr.repo().checkout(root, out.path()).unwrap_err() {
            Error::NotFound(_) => (),
            err => panic!("wrong error: {:?}", err),
        }

        assert!(out.path().join("a.txt").is_file());
        assert!(!out.path().join("b.txt").exists());
    }
}
