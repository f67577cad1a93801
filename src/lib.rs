pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::{ServerConfig, TraversalPolicy};
pub use error::{ErrorClass, FailureKind, FileOpError, ToolError};
pub use protocol::FileService;
pub use server::Server;
