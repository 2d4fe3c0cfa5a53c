use std::fs;
use std::path::{Path, PathBuf};

use crate::object::{Id, Kind};
use crate::Repo;

/// A `TempRepo` lays out a minimal, empty `.git` directory in a temporary
/// directory: `objects/`, `refs/heads/`, `refs/tags/`, and a `HEAD` pointing
/// at `refs/heads/master`.
///
/// Because this struct is intended for testing, its functions
/// panic instead of returning Result structs.
pub(crate) struct TempRepo {
    #[allow(dead_code)] // tempdir is only used for RAII
    tempdir: tempfile::TempDir,
    work_dir: PathBuf,
}

impl TempRepo {
    // Create a new repo in a temporary directory.
    // This directory will be deleted when the struct is dropped.
    pub fn new() -> TempRepo {
        let tempdir = tempfile::tempdir().unwrap();
        let work_dir = tempdir.path().to_path_buf();

        let git_dir = work_dir.join(".git");
        fs::create_dir_all(git_dir.join("objects")).unwrap();
        fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
        fs::create_dir_all(git_dir.join("refs/tags")).unwrap();
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n").unwrap();

        TempRepo { tempdir, work_dir }
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    pub fn git_dir(&self) -> PathBuf {
        self.work_dir.join(".git")
    }

    pub fn repo(&self) -> Repo {
        Repo::open(&self.work_dir).unwrap()
    }

    // Write a reference file (path relative to `.git`) with the given content.
    pub fn write_ref(&self, name: &str, content: &str) {
        let path = self.git_dir().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    // Point a reference directly at an object.
    pub fn set_ref(&self, name: &str, id: Id) {
        self.write_ref(name, &format!("{}\n", id));
    }

    pub fn write(&self, kind: Kind, payload: &[u8]) -> Id {
        self.repo().write_raw(kind, payload).unwrap()
    }
}
