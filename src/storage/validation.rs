//! Path validation
//!
//! Handles path validation and security checks for every requested path.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::TraversalPolicy;
use crate::error::FileOpError;
use crate::utils::EventLog;

/// An absolute path that has passed [`PathValidator::validate`].
///
/// Only the validator can construct one, so the file operations never see
/// raw caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
    requested: String,
}

impl ValidatedPath {
    /// The resolved absolute path
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// The path exactly as the caller supplied it, used in messages
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ValidatedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Normalizes and security-checks caller supplied paths.
#[derive(Clone)]
pub struct PathValidator {
    policy: TraversalPolicy,
    log: Arc<dyn EventLog>,
}

impl PathValidator {
    pub fn new(policy: TraversalPolicy, log: Arc<dyn EventLog>) -> Self {
        Self { policy, log }
    }

    /// Validate a raw path, resolving it against the current directory.
    pub fn validate(&self, raw_path: &str) -> Result<ValidatedPath, FileOpError> {
        let base = std::env::current_dir().map_err(|e| {
            FileOpError::internal(format!("Cannot determine current directory: {}", e))
        })?;
        self.validate_with_base(raw_path, &base)
    }

    /// Validate a raw path, resolving relative input against `base`.
    pub fn validate_with_base(
        &self,
        raw_path: &str,
        base: &Path,
    ) -> Result<ValidatedPath, FileOpError> {
        if raw_path.trim().is_empty() {
            return Err(FileOpError::invalid_path("File path cannot be empty"));
        }

        // Check null bytes before any Path handling
        if raw_path.contains('\0') {
            self.log.warn("Rejected path containing a null byte");
            return Err(FileOpError::invalid_path("Invalid characters in file path"));
        }

        let requested = Path::new(raw_path);

        if has_parent_segment(requested) {
            self.log
                .warn(&format!("Path traversal attempt detected: {}", raw_path));
            if self.policy == TraversalPolicy::Reject {
                return Err(FileOpError::invalid_path(format!(
                    "Path traversal is not allowed: {}",
                    raw_path
                )));
            }
        }

        if requested.is_absolute() {
            self.log
                .debug(&format!("Absolute path requested: {}", raw_path));
        }

        let joined = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            base.join(requested)
        };

        Ok(ValidatedPath {
            path: normalize(&joined),
            requested: raw_path.to_string(),
        })
    }
}

/// True if any component of `path` is a `..` segment
pub fn has_parent_segment(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Lexically normalize an absolute path, dropping `.` and folding `..`.
///
/// `..` at the root stays at the root. The filesystem is not consulted.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
