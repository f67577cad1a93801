//! Storage operations
//!
//! Read, write and list over validated paths. Each call is independent and
//! returns a typed failure instead of retrying.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tempfile::{Builder, NamedTempFile};

use crate::config::ServerConfig;
use crate::error::{FailureKind, FileOpError};
use crate::storage::content::{ContentClassifier, Undecodable};
use crate::storage::filesystem::{blocking_ancestor, format_modified, io_failure, stat_if_exists};
use crate::storage::results::{DirectoryEntry, EntryKind, ListResult, WriteResult};
use crate::storage::validation::ValidatedPath;
use crate::utils::EventLog;

/// File operations over validated paths
#[derive(Clone)]
pub struct FileStore {
    classifier: ContentClassifier,
    max_read_bytes: Option<u64>,
    sort_entries: bool,
    atomic_writes: bool,
    log: Arc<dyn EventLog>,
}

impl FileStore {
    pub fn new(config: &ServerConfig, log: Arc<dyn EventLog>) -> Self {
        Self {
            classifier: ContentClassifier::new(config.binary_sniff_bytes, config.binary_threshold),
            max_read_bytes: config.max_read_bytes,
            sort_entries: config.sort_entries,
            atomic_writes: config.atomic_writes,
            log,
        }
    }

    /// Reads a whole text file
    pub fn read_file(&self, path: &ValidatedPath) -> Result<String, FileOpError> {
        self.log.debug(&format!("Reading file: {}", path));
        let requested = path.requested();

        let metadata = match stat_if_exists(path.as_path()) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                return Err(self.fail(
                    path,
                    FileOpError::not_found(format!("File not found: {}", requested)),
                ));
            }
            Err(e) => {
                return Err(self.fail(
                    path,
                    io_failure(&e, format!("Cannot access file {}: {}", requested, e)),
                ));
            }
        };

        if !metadata.is_file() {
            return Err(self.fail(
                path,
                FileOpError::new(
                    FailureKind::NotAFile,
                    format!("Path is not a file: {}", requested),
                ),
            ));
        }

        if let Some(limit) = self.max_read_bytes {
            if metadata.len() > limit {
                return Err(self.fail(
                    path,
                    FileOpError::new(
                        FailureKind::TooLarge,
                        format!(
                            "File too large: {} ({} bytes, limit {} bytes)",
                            requested,
                            metadata.len(),
                            limit
                        ),
                    ),
                ));
            }
        }

        let bytes = fs::read(path.as_path()).map_err(|e| {
            let failure = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    FileOpError::permission_denied(format!("Permission denied reading file: {}", requested))
                }
                _ => io_failure(&e, format!("Error reading file: {}", e)),
            };
            self.fail(path, failure)
        })?;

        match String::from_utf8(bytes) {
            Ok(content) => {
                self.log.debug(&format!(
                    "Successfully read file: {} ({} bytes)",
                    path,
                    content.len()
                ));
                Ok(content)
            }
            Err(e) => {
                let failure = match self.classifier.classify(e.as_bytes()) {
                    Undecodable::Binary => FileOpError::new(
                        FailureKind::BinaryContent,
                        format!(
                            "Cannot read binary file: {}. Only text files are supported.",
                            requested
                        ),
                    ),
                    Undecodable::ForeignEncoding => FileOpError::new(
                        FailureKind::EncodingError,
                        format!(
                            "Cannot decode file as UTF-8: {}. File may be binary or use unsupported encoding.",
                            requested
                        ),
                    ),
                };
                Err(self.fail(path, failure))
            }
        }
    }

    /// Writes `content` as the full contents of the file, creating missing
    /// parent directories.
    pub fn write_file(
        &self,
        path: &ValidatedPath,
        content: &str,
    ) -> Result<WriteResult, FileOpError> {
        self.log
            .debug(&format!("Writing file: {} ({} bytes)", path, content.len()));
        let requested = path.requested();
        let target = path.as_path();

        let existing = stat_if_exists(target).map_err(|e| {
            self.fail(
                path,
                io_failure(&e, format!("Cannot access file {}: {}", requested, e)),
            )
        })?;

        if existing.as_ref().is_some_and(|m| m.is_dir()) {
            return Err(self.fail(
                path,
                FileOpError::new(
                    FailureKind::NotAFile,
                    format!("Cannot write to directory: {}", requested),
                ),
            ));
        }

        let parent = target.parent().ok_or_else(|| {
            self.fail(
                path,
                FileOpError::invalid_path(format!("Path has no parent directory: {}", requested)),
            )
        })?;

        match blocking_ancestor(target) {
            Ok(Some(ancestor)) => {
                return Err(self.fail(
                    path,
                    FileOpError::new(
                        FailureKind::NotADirectory,
                        format!("Parent path is not a directory: {}", ancestor.display()),
                    ),
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return Err(self.fail(
                    path,
                    io_failure(&e, format!("Cannot inspect parent directories: {}", e)),
                ));
            }
        }

        fs::create_dir_all(parent).map_err(|e| {
            let failure = match e.kind() {
                io::ErrorKind::PermissionDenied => FileOpError::permission_denied(format!(
                    "Permission denied creating parent directories for: {}",
                    requested
                )),
                _ => io_failure(&e, format!("Error creating parent directories: {}", e)),
            };
            self.fail(path, failure)
        })?;

        let created = existing.is_none();
        self.log.debug(&format!(
            "{} file: {}",
            if created { "Creating" } else { "Overwriting" },
            path
        ));

        let written = if self.atomic_writes {
            replace_atomically(target, content, existing.as_ref()).map(|mode| {
                if mode == WriteMode::InPlace {
                    self.log.debug(&format!(
                        "Directory not writable, rewrote file in place: {}",
                        path
                    ));
                }
            })
        } else {
            fs::write(target, content.as_bytes())
        };

        written.map_err(|e| {
            let failure = match e.kind() {
                io::ErrorKind::PermissionDenied => FileOpError::permission_denied(format!(
                    "Permission denied writing file: {}",
                    requested
                )),
                _ => io_failure(&e, format!("Error writing file: {}", e)),
            };
            self.fail(path, failure)
        })?;

        self.log.debug(&format!(
            "Successfully {} file: {}",
            if created { "created" } else { "overwrote" },
            path
        ));

        Ok(WriteResult {
            created,
            bytes_written: content.len(),
        })
    }

    /// Lists the immediate children of a directory
    pub fn list_directory(&self, path: &ValidatedPath) -> Result<ListResult, FileOpError> {
        self.log.debug(&format!("Listing directory: {}", path));
        let requested = path.requested();

        let metadata = match stat_if_exists(path.as_path()) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                return Err(self.fail(
                    path,
                    FileOpError::not_found(format!("Directory not found: {}", requested)),
                ));
            }
            Err(e) => {
                return Err(self.fail(
                    path,
                    io_failure(&e, format!("Cannot access directory {}: {}", requested, e)),
                ));
            }
        };

        if !metadata.is_dir() {
            return Err(self.fail(
                path,
                FileOpError::new(
                    FailureKind::NotADirectory,
                    format!("Path is not a directory: {}", requested),
                ),
            ));
        }

        let read_dir = fs::read_dir(path.as_path()).map_err(|e| {
            let failure = match e.kind() {
                io::ErrorKind::PermissionDenied => FileOpError::permission_denied(format!(
                    "Permission denied listing directory: {}",
                    requested
                )),
                _ => io_failure(&e, format!("Error listing directory: {}", e)),
            };
            self.fail(path, failure)
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                self.fail(path, io_failure(&e, format!("Error listing directory: {}", e)))
            })?;
            entries.push(self.describe_entry(&entry));
        }

        if self.sort_entries {
            entries.sort_by_key(|entry| entry.name.to_lowercase());
        }

        self.log.debug(&format!(
            "Successfully listed directory: {} ({} entries)",
            path,
            entries.len()
        ));

        Ok(ListResult {
            directory: path.to_string(),
            total_entries: entries.len(),
            entries,
        })
    }

    fn describe_entry(&self, entry: &fs::DirEntry) -> DirectoryEntry {
        let name = entry.file_name().to_string_lossy().to_string();
        let child = entry.path();

        // fs::metadata follows symlinks; DirEntry::metadata would not
        match fs::metadata(&child) {
            Ok(metadata) => DirectoryEntry {
                name,
                kind: if metadata.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
                size: metadata.is_file().then(|| metadata.len()),
                modified: metadata.modified().ok().map(format_modified),
                path: child.display().to_string(),
                error: None,
            },
            Err(e) => {
                self.log
                    .warn(&format!("Error accessing entry {}: {}", child.display(), e));
                DirectoryEntry {
                    name,
                    kind: EntryKind::Unknown,
                    size: None,
                    modified: None,
                    path: child.display().to_string(),
                    error: Some("Permission denied or access error".to_string()),
                }
            }
        }
    }

    /// Logs a failure with its path and kind, then hands it back.
    fn fail(&self, path: &ValidatedPath, failure: FileOpError) -> FileOpError {
        let line = format!("{} failed for {}: {}", failure.kind, path, failure.message);
        if failure.kind.is_system() {
            self.log.error(&line);
        } else {
            self.log.warn(&line);
        }
        failure
    }
}

/// Write to a temporary file beside the real target and rename it over
/// that target, so readers see either the old or the new contents.
///
/// Symlinks are written through: an existing path is canonicalized first.
/// New files get `0o666` minus the umask, like `fs::write`; overwritten files
/// keep their mode. When the directory refuses new entries the file is
/// rewritten in place instead.
fn replace_atomically(
    target: &Path,
    content: &str,
    existing: Option<&fs::Metadata>,
) -> io::Result<WriteMode> {
    let resolved = match existing {
        Some(_) => fs::canonicalize(target)?,
        None => target.to_path_buf(),
    };
    let parent = resolved
        .parent()
        .ok_or_else(|| io::Error::other("target has no parent directory"))?;

    let mut temp = match temp_file_in(parent) {
        Ok(temp) => temp,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            fs::write(&resolved, content.as_bytes())?;
            return Ok(WriteMode::InPlace);
        }
        Err(e) => return Err(e),
    };
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    if let Some(metadata) = existing {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(&resolved).map_err(|e| e.error)?;
    Ok(WriteMode::Renamed)
}

/// How a write reached the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Renamed,
    InPlace,
}

#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // open(2) applies the umask to this mode
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}
