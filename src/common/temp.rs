//! Scratch directories that must not outlive the step that made them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout;

/// Prepare a work directory, removing it if it exists and creating it fresh.
pub fn prepare_work_dir(parent_dir: &Path, name: &str) -> io::Result<PathBuf> {
    let work_dir = parent_dir.join(name);

    if work_dir.exists() {
        fs::remove_dir_all(&work_dir)?;
    }
    fs::create_dir_all(&work_dir)?;

    Ok(work_dir)
}

/// Remove a directory tree if present.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Whether removing `dir` would delete part of the live source tree.
///
/// True when `dir` is the source root or one of its ancestors, or when it
/// is, contains, or sits inside the driver source directory. Paths need not
/// exist: each is resolved through its nearest existing ancestor, so
/// symlinks and `..` are compared by where they lead.
pub fn overlaps_source_tree(dir: &Path, source_root: &Path) -> io::Result<bool> {
    let dir = resolve(dir)?;
    let source_root = resolve(source_root)?;
    let driver_src = source_root.join(layout::DRIVER_SOURCE_DIR);

    Ok(source_root.starts_with(&dir)
        || driver_src.starts_with(&dir)
        || dir.starts_with(&driver_src))
}

/// Absolute, symlink-free form of `path`, which may not exist yet.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let path = std::path::absolute(path)?;
    let mut existing = path.as_path();
    let mut rest = Vec::new();
    loop {
        match fs::canonicalize(existing) {
            Ok(resolved) => {
                return Ok(rest.iter().rev().fold(resolved, |acc, part| acc.join(part)));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(e);
                };
                rest.push(name.to_os_string());
                existing = parent;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A directory tree removed when the guard goes out of scope.
///
/// [`ScopedDir::remove`] removes it explicitly and reports failure; dropping
/// the guard without calling it removes on a best-effort basis, which covers
/// early returns on error. Nothing runs if the process is killed.
#[derive(Debug)]
pub struct ScopedDir {
    root: PathBuf,
    armed: bool,
}

impl ScopedDir {
    /// Take ownership of `root`. The directory itself need not exist yet.
    pub fn new(root: PathBuf) -> Self {
        Self { root, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn remove(mut self) -> io::Result<()> {
        self.armed = false;
        remove_dir_if_exists(&self.root).map(|_| ())
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = remove_dir_if_exists(&self.root) {
                tracing::warn!(path = %self.root.display(), error = %e, "failed to remove scratch directory");
            }
        }
    }
}
