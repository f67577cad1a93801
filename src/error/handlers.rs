//! Error handlers
//!
//! Maps internal failures onto the classes and codes a dispatcher reports.

use crate::error::types::{ErrorClass, FailureKind, ToolError};

/// Classify an operation failure for the outside world.
pub fn failure_class(kind: FailureKind) -> ErrorClass {
    match kind {
        FailureKind::InvalidPath => ErrorClass::InvalidParams,
        FailureKind::NotFound
        | FailureKind::NotAFile
        | FailureKind::NotADirectory
        | FailureKind::BinaryContent
        | FailureKind::EncodingError
        | FailureKind::TooLarge => ErrorClass::InvalidRequest,
        FailureKind::PermissionDenied | FailureKind::InternalError => ErrorClass::InternalError,
    }
}

/// Classify any dispatcher error.
pub fn error_class(err: &ToolError) -> ErrorClass {
    match err {
        ToolError::InvalidParams(_) => ErrorClass::InvalidParams,
        ToolError::InvalidRequest(_) => ErrorClass::InvalidRequest,
        ToolError::Operation(e) => failure_class(e.kind),
    }
}

/// Convert an error class to its JSON-RPC style numeric code
pub fn error_code(class: ErrorClass) -> i64 {
    match class {
        ErrorClass::InvalidRequest => -32600,
        ErrorClass::InvalidParams => -32602,
        ErrorClass::InternalError => -32603,
    }
}
