//! MCP File Server - Entry Point
//!
//! Serves read_file, write_file and list_directory requests over stdio.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use mcp_file_server::utils::{LogFacade, setup_logging};
use mcp_file_server::{FileService, Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries responses
    setup_logging();

    info!("Starting MCP File Server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Traversal policy: {:?}, atomic writes: {}",
        config.traversal_policy, config.atomic_writes
    );

    let server = Server::new(FileService::new(&config, Arc::new(LogFacade)));
    info!("Server ready to accept requests on stdin");

    let code = tokio::select! {
        result = server.run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Error running MCP File Server: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping MCP File Server...");
            ExitCode::SUCCESS
        }
    };

    info!("MCP File Server shutdown complete");
    code
}
