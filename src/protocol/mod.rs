//! Tool protocol
//!
//! Handles request parsing, dispatch to the file operations, and response
//! generation.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{ToolCall, ToolDescriptor, tool_descriptors};
pub use handlers::FileService;
pub use parser::{ToolRequest, parse_request};
pub use responses::ToolResponse;
