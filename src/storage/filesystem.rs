//! File system helpers
//!
//! Metadata lookups and io error mapping shared by the file operations.

use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{FailureKind, FileOpError};

/// Stat a path, following symlinks. `Ok(None)` if nothing is there, which
/// includes a path running through a regular file.
pub fn stat_if_exists(path: &Path) -> io::Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Nearest existing ancestor of `path` that is not a directory, if any.
///
/// Stops at the first ancestor that exists.
pub fn blocking_ancestor(path: &Path) -> io::Result<Option<&Path>> {
    for ancestor in path.ancestors().skip(1) {
        if let Some(metadata) = stat_if_exists(ancestor)? {
            return Ok(if metadata.is_dir() {
                None
            } else {
                Some(ancestor)
            });
        }
    }
    Ok(None)
}

/// Wrap an io error with a caller-facing message
pub fn io_failure(error: &io::Error, message: impl Into<String>) -> FileOpError {
    FileOpError::new(FailureKind::from_io(error.kind()), message)
}

/// Local modification time in `YYYY-MM-DDTHH:MM:SS.ffffff` form
pub fn format_modified(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
