//! File enumeration and copying.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::EnumerationError;

/// Recursively list every regular file under `root`.
///
/// Returned paths are joined with `root`. Directories are not yielded.
/// Symlinks are not followed into directories, but a symlink that resolves
/// to a file is listed like a file. Entries are visited in file-name order,
/// so repeated calls on an unchanged tree return the same sequence.
///
/// A missing or unreadable `root` is an error rather than an empty list.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, EnumerationError> {
    if !root.exists() {
        return Err(EnumerationError::Missing {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(EnumerationError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| EnumerationError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Write a file, creating parent directories as needed.
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Copy a file, creating the destination's parent directories as needed.
///
/// An existing file at `dst` is overwritten.
pub fn copy_file_with_dirs(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
}

/// Recursively copy the contents of `src` into `dst`.
///
/// Files already present in `dst` are overwritten; files only present in
/// `dst` are left alone. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<usize> {
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file())
        {
            copy_file_with_dirs(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// SHA-256 of a file's contents, hex-encoded.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
