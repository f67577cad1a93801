//! Error types
//!
//! Defines the failure taxonomy shared by path validation, the file
//! operations and the request dispatcher.

use std::fmt;
use std::io;

/// Kind of failure produced by a single file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    InvalidPath,
    NotAFile,
    NotADirectory,
    BinaryContent,
    EncodingError,
    TooLarge,
    InternalError,
}

impl FailureKind {
    /// Stable snake_case name used in responses and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "not_found",
            FailureKind::PermissionDenied => "permission_denied",
            FailureKind::InvalidPath => "invalid_path",
            FailureKind::NotAFile => "not_a_file",
            FailureKind::NotADirectory => "not_a_directory",
            FailureKind::BinaryContent => "binary_content",
            FailureKind::EncodingError => "encoding_error",
            FailureKind::TooLarge => "too_large",
            FailureKind::InternalError => "internal_error",
        }
    }

    /// Kind for an io error raised by a filesystem call
    pub fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FailureKind::NotFound,
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            _ => FailureKind::InternalError,
        }
    }

    /// Semantic failures are the caller's problem; the rest point at the host.
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            FailureKind::PermissionDenied | FailureKind::InternalError
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure returned by every file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOpError {
    pub kind: FailureKind,
    pub message: String,
}

impl FileOpError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidPath, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(FailureKind::PermissionDenied, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InternalError, message)
    }
}

impl fmt::Display for FileOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for FileOpError {}

/// Externally visible error class a dispatcher reports to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidParams,
    InvalidRequest,
    InternalError,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::InvalidParams => "invalid_params",
            ErrorClass::InvalidRequest => "invalid_request",
            ErrorClass::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by the dispatcher before or after an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments missing or of the wrong shape.
    InvalidParams(String),
    /// Unknown tool or malformed request.
    InvalidRequest(String),
    /// The operation itself failed.
    Operation(FileOpError),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::InvalidParams(msg) => write!(f, "Invalid parameters: {}", msg),
            ToolError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ToolError::Operation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<FileOpError> for ToolError {
    fn from(error: FileOpError) -> Self {
        ToolError::Operation(error)
    }
}

/// Start-up configuration errors
#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        ConfigError::Load(error)
    }
}
