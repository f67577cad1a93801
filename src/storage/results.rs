//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::Serialize;

/// Result of a file write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// No file existed at the path before the write
    pub created: bool,
    pub bytes_written: usize,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    /// The entry could not be stat'ed
    Unknown,
}

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: Option<u64>,
    pub modified: Option<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a directory listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult {
    pub directory: String,
    pub entries: Vec<DirectoryEntry>,
    pub total_entries: usize,
}
