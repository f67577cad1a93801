//! Module `commands`
//!
//! Defines the tool calls a client can make, their typed arguments, and the
//! catalog describing them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ToolError;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_DIRECTORY: &str = "list_directory";
pub const LIST_TOOLS: &str = "list_tools";

/// A tool call with its arguments already checked for shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ReadFile { file_path: String },
    WriteFile { file_path: String, content: String },
    ListDirectory { directory_path: String },
    ListTools,
}

#[derive(Deserialize)]
struct ReadFileArgs {
    file_path: String,
}

#[derive(Deserialize)]
struct WriteFileArgs {
    file_path: String,
    content: String,
}

#[derive(Deserialize)]
struct ListDirectoryArgs {
    directory_path: String,
}

impl ToolCall {
    /// Build a call from a tool name and its JSON arguments.
    ///
    /// Unknown tools are an invalid request; missing or ill-typed arguments
    /// are invalid parameters.
    pub fn from_parts(tool: &str, arguments: Value) -> Result<Self, ToolError> {
        // Absent arguments behave like an empty object
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        match tool {
            READ_FILE => {
                let args: ReadFileArgs = parse_args(tool, arguments)?;
                Ok(ToolCall::ReadFile {
                    file_path: args.file_path,
                })
            }
            WRITE_FILE => {
                let args: WriteFileArgs = parse_args(tool, arguments)?;
                Ok(ToolCall::WriteFile {
                    file_path: args.file_path,
                    content: args.content,
                })
            }
            LIST_DIRECTORY => {
                let args: ListDirectoryArgs = parse_args(tool, arguments)?;
                Ok(ToolCall::ListDirectory {
                    directory_path: args.directory_path,
                })
            }
            LIST_TOOLS => Ok(ToolCall::ListTools),
            other => Err(ToolError::InvalidRequest(format!("Unknown tool: {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ReadFile { .. } => READ_FILE,
            ToolCall::WriteFile { .. } => WRITE_FILE,
            ToolCall::ListDirectory { .. } => LIST_DIRECTORY,
            ToolCall::ListTools => LIST_TOOLS,
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::InvalidParams(format!("{}: {}", tool, e)))
}

/// Catalog entry for one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// The file tools this server exposes
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: READ_FILE,
            description: "Read the contents of a text file.",
            input_schema: object_schema(&[("file_path", "Path to the file to read")]),
        },
        ToolDescriptor {
            name: WRITE_FILE,
            description: "Write content to a file, creating parent directories as needed.",
            input_schema: object_schema(&[
                ("file_path", "Path to the file to write"),
                ("content", "Content to write to the file"),
            ]),
        },
        ToolDescriptor {
            name: LIST_DIRECTORY,
            description: "List the contents of a directory with file metadata.",
            input_schema: object_schema(&[("directory_path", "Path to the directory to list")]),
        },
    ]
}

fn object_schema(fields: &[(&str, &str)]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_calls() {
        assert_eq!(
            ToolCall::from_parts("read_file", json!({ "file_path": "a.txt" })).unwrap(),
            ToolCall::ReadFile {
                file_path: "a.txt".into()
            }
        );
        assert_eq!(
            ToolCall::from_parts(
                "write_file",
                json!({ "file_path": "a.txt", "content": "" })
            )
            .unwrap(),
            ToolCall::WriteFile {
                file_path: "a.txt".into(),
                content: String::new()
            }
        );
        assert_eq!(
            ToolCall::from_parts("list_directory", json!({ "directory_path": "." })).unwrap(),
            ToolCall::ListDirectory {
                directory_path: ".".into()
            }
        );
        assert_eq!(
            ToolCall::from_parts("list_tools", Value::Null).unwrap(),
            ToolCall::ListTools
        );
    }

    #[test]
    fn test_missing_argument_is_invalid_params() {
        let err = ToolCall::from_parts("write_file", json!({ "file_path": "a.txt" })).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));

        let err = ToolCall::from_parts("read_file", Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[test]
    fn test_wrong_type_is_invalid_params() {
        let err = ToolCall::from_parts("read_file", json!({ "file_path": 42 })).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[test]
    fn test_unknown_tool_is_invalid_request() {
        let err = ToolCall::from_parts("delete_file", json!({})).unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidRequest("Unknown tool: delete_file".into())
        );
    }

    #[test]
    fn test_descriptors_list_required_fields() {
        let tools = tool_descriptors();
        assert_eq!(tools.len(), 3);
        let write = tools.iter().find(|t| t.name == WRITE_FILE).unwrap();
        assert_eq!(write.input_schema["required"], json!(["file_path", "content"]));
    }
}
