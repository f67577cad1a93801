//! File system storage management
//!
//! Handles path validation, content classification, and the read, write and
//! list operations.

pub mod content;
pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use operations::FileStore;
pub use results::{DirectoryEntry, EntryKind, ListResult, WriteResult};
pub use validation::{PathValidator, ValidatedPath};
