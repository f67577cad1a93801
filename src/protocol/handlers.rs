//! Tool dispatch
//!
//! Routes each tool call through the path validator to the matching file
//! operation and renders the outcome as a response payload.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::{FileOpError, ToolError};
use crate::protocol::commands::{ToolCall, tool_descriptors};
use crate::protocol::parser::ToolRequest;
use crate::protocol::responses::ToolResponse;
use crate::storage::operations::FileStore;
use crate::storage::results::{ListResult, WriteResult};
use crate::storage::validation::PathValidator;
use crate::utils::EventLog;

/// Validator and file store bundled behind the three file tools.
///
/// Holds no per-call state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct FileService {
    validator: PathValidator,
    store: FileStore,
    log: Arc<dyn EventLog>,
}

impl FileService {
    pub fn new(config: &ServerConfig, log: Arc<dyn EventLog>) -> Self {
        Self {
            validator: PathValidator::new(config.traversal_policy, log.clone()),
            store: FileStore::new(config, log.clone()),
            log,
        }
    }

    pub fn validator(&self) -> &PathValidator {
        &self.validator
    }

    /// `read_file`: validate, then read the text content
    pub fn read_file(&self, file_path: &str) -> Result<String, ToolError> {
        let path = self.validator.validate(file_path)?;
        Ok(self.store.read_file(&path)?)
    }

    /// `write_file`: validate, then replace the file's contents
    pub fn write_file(&self, file_path: &str, content: &str) -> Result<WriteResult, ToolError> {
        let path = self.validator.validate(file_path)?;
        Ok(self.store.write_file(&path, content)?)
    }

    /// `list_directory`: validate, then enumerate immediate children
    pub fn list_directory(&self, directory_path: &str) -> Result<ListResult, ToolError> {
        let path = self.validator.validate(directory_path)?;
        Ok(self.store.list_directory(&path)?)
    }

    /// Execute a call and render its payload as response text.
    pub fn handle_call(&self, call: &ToolCall) -> Result<String, ToolError> {
        match call {
            ToolCall::ReadFile { file_path } => {
                self.log.info(&format!("read_file: {}", file_path));
                self.read_file(file_path)
            }
            ToolCall::WriteFile { file_path, content } => {
                self.log.info(&format!("write_file: {}", file_path));
                let result = self.write_file(file_path, content)?;
                Ok(format!(
                    "Successfully {} file: {}",
                    if result.created { "created" } else { "overwrote" },
                    file_path
                ))
            }
            ToolCall::ListDirectory { directory_path } => {
                self.log.info(&format!("list_directory: {}", directory_path));
                let listing = self.list_directory(directory_path)?;
                to_pretty_json(&listing)
            }
            ToolCall::ListTools => to_pretty_json(&tool_descriptors()),
        }
    }

    /// Turn a parsed request into the response to send back.
    pub fn handle_request(&self, request: ToolRequest) -> ToolResponse {
        let ToolRequest { id, call } = request;
        let outcome = call.and_then(|call| self.handle_call(&call));

        match outcome {
            Ok(content) => ToolResponse::success(id, content),
            Err(err) => {
                if !matches!(err, ToolError::Operation(_)) {
                    self.log.warn(&format!("Rejected request: {}", err));
                }
                ToolResponse::failure(id, &err)
            }
        }
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ToolError::Operation(FileOpError::internal(format!(
            "Failed to serialize response: {}",
            e
        )))
    })
}
