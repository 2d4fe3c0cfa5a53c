use std::fs;
use std::path::Path;
use std::process::Command;

use mingit::object::Id;
use mingit::Repo;

use tempfile::TempDir;

/// Lay out an empty `.git` directory in a fresh temporary directory
/// and open it. `HEAD` points at `refs/heads/master`.
#[allow(dead_code)]
pub fn temp_repo() -> (TempDir, Repo) {
    let dir = tempfile::tempdir().unwrap();
    let git_dir = dir.path().join(".git");

    fs::create_dir_all(git_dir.join("objects")).unwrap();
    fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
    fs::create_dir_all(git_dir.join("refs/tags")).unwrap();
    fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n").unwrap();

    let repo = Repo::open(dir.path()).unwrap();
    (dir, repo)
}

#[allow(dead_code)]
pub fn write_ref(repo: &Repo, name: &str, content: &str) {
    let path = repo.git_dir().join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[allow(dead_code)]
pub fn set_ref(repo: &Repo, name: &str, id: Id) {
    write_ref(repo, name, &format!("{}\n", id));
}

#[allow(dead_code)]
pub fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

/// Run command-line git in `dir`, isolated from user and system config,
/// and return its stdout. Panics if git fails.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> Vec<u8> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("HOME", dir)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "git {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output.stdout
}

/// A repository created by `git init`, opened with mingit.
#[allow(dead_code)]
pub fn git_init() -> (TempDir, Repo) {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);

    let repo = Repo::open(dir.path()).unwrap();
    (dir, repo)
}
