//! Capability-oriented file helpers shared by the property loader, the setup
//! reset and the external tool checks.
//!
//! Every access opens the parent directory with ambient authority and works
//! relative to it, following the `cap_std::fs_utf8` conventions used for
//! configuration loading.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::FilesystemError;

/// Split `path` into its parent directory handle and final component.
pub(crate) fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), FilesystemError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| FilesystemError::IoError {
        path: path.to_owned(),
        message: String::from("path has no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| io_error(parent, &error))?;
    Ok((dir, file_name))
}

/// Read a UTF-8 file.
pub(crate) fn read_to_string(path: &Utf8Path) -> Result<String, FilesystemError> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name)
        .map_err(|error| io_error(path, &error))
}

/// Write `contents` to `path`, replacing any existing file.
pub(crate) fn write(path: &Utf8Path, contents: &str) -> Result<(), FilesystemError> {
    let (dir, file_name) = open_parent(path)?;
    dir.write(file_name, contents)
        .map_err(|error| io_error(path, &error))
}

/// Copy `from` over `to`, returning the number of bytes copied.
pub(crate) fn copy(from: &Utf8Path, to: &Utf8Path) -> Result<u64, FilesystemError> {
    let (source_dir, source_name) = open_parent(from)?;
    let (target_dir, target_name) = open_parent(to)?;
    source_dir
        .copy(source_name, &target_dir, target_name)
        .map_err(|error| io_error(from, &error))
}

/// Whether `path` names an existing file or directory.
///
/// Any error while opening the parent counts as "does not exist".
#[must_use]
pub(crate) fn exists(path: &Utf8Path) -> bool {
    match open_parent(path) {
        Ok((dir, file_name)) => dir.exists(file_name),
        Err(_) => Dir::open_ambient_dir(path, ambient_authority()).is_ok(),
    }
}

/// Resolve `path` against `base` unless it is already absolute.
#[must_use]
pub(crate) fn resolve(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

fn io_error(path: &Utf8Path, error: &io::Error) -> FilesystemError {
    if error.kind() == io::ErrorKind::NotFound {
        FilesystemError::NotFound {
            path: path.to_owned(),
        }
    } else {
        FilesystemError::IoError {
            path: path.to_owned(),
            message: error.to_string(),
        }
    }
}
