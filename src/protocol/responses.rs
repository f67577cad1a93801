//! Response handling
//!
//! Defines the response envelope written back for each request.

use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;
use crate::error::handlers::{error_class, error_code};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBody {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: i64,
    pub class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub message: String,
}

/// One response line: exactly one of `result` or `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    pub fn success(id: Option<Value>, content: String) -> Self {
        Self {
            id: id.unwrap_or(Value::Null),
            result: Some(ResultBody { content }),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, err: &ToolError) -> Self {
        let class = error_class(err);
        let (kind, message) = match err {
            ToolError::Operation(e) => (Some(e.kind.as_str()), e.message.clone()),
            other => (None, other.to_string()),
        };

        Self {
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(ErrorBody {
                code: error_code(class),
                class: class.as_str(),
                kind,
                message,
            }),
        }
    }

    /// Serialize to a single line of JSON
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
