//! Request parsing
//!
//! Turns one line of client input into a [`ToolRequest`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::commands::ToolCall;

/// Envelope of a single request line
#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    id: Option<Value>,
    tool: String,
    #[serde(default)]
    arguments: Value,
}

/// A parsed request: correlation id plus either a call or the reason it
/// could not be built.
#[derive(Debug)]
pub struct ToolRequest {
    pub id: Option<Value>,
    pub call: Result<ToolCall, ToolError>,
}

/// Parse a request line of the form
/// `{"id": ..., "tool": "read_file", "arguments": {...}}`.
pub fn parse_request(line: &str) -> ToolRequest {
    let value: Value = match serde_json::from_str(line.trim()) {
        Ok(value) => value,
        Err(e) => {
            return ToolRequest {
                id: None,
                call: Err(ToolError::InvalidRequest(format!("Malformed JSON: {}", e))),
            };
        }
    };

    // Keep the id even when the rest of the envelope is wrong
    let id = value.get("id").cloned().filter(|id| !id.is_null());

    match serde_json::from_value::<RawRequest>(value) {
        Ok(raw) => ToolRequest {
            id: raw.id.or(id),
            call: ToolCall::from_parts(&raw.tool, raw.arguments),
        },
        Err(e) => ToolRequest {
            id,
            call: Err(ToolError::InvalidRequest(format!("Malformed request: {}", e))),
        },
    }
}
