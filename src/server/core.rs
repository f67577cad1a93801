//! Request loop
//!
//! Reads newline-delimited JSON requests, runs each one on its own task and
//! writes one response line per request. Responses may come back out of
//! order; the request `id` ties them together.

use log::{debug, error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::error::{FileOpError, ToolError};
use crate::protocol::{FileService, ToolResponse, parse_request};

/// Responses waiting for the writer before request tasks block
const RESPONSE_QUEUE: usize = 64;

/// Requests being handled at once; reading stdin pauses at this limit
const MAX_IN_FLIGHT: usize = 64;

pub struct Server {
    service: Arc<FileService>,
}

impl Server {
    pub fn new(service: FileService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Serve requests from stdin until it closes
    pub async fn run(&self) -> io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests from `reader`, writing responses to `writer`.
    ///
    /// Returns once the reader hits EOF and every in-flight request has been
    /// answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(RESPONSE_QUEUE);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut lines = BufReader::new(reader).lines();
        let mut tasks = JoinSet::new();
        let in_flight = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
        let mut received = 0usize;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            received += 1;

            let permit = Arc::clone(&in_flight)
                .acquire_owned()
                .await
                .map_err(io::Error::other)?;
            let service = Arc::clone(&self.service);
            let tx = tx.clone();

            // Spawn a task per request so a slow filesystem call doesn't hold up the rest
            tasks.spawn(async move {
                let _permit = permit;
                let response =
                    tokio::task::spawn_blocking(move || service.handle_request(parse_request(&line)))
                        .await
                        .unwrap_or_else(|e| {
                            error!("Request handler panicked: {}", e);
                            ToolResponse::failure(
                                None,
                                &ToolError::Operation(FileOpError::internal(
                                    "Request handler failed",
                                )),
                            )
                        });

                match response.to_line() {
                    Ok(line) => {
                        if tx.send(line).await.is_err() {
                            warn!("Response writer closed, dropping response");
                        }
                    }
                    Err(e) => error!("Failed to serialize response: {}", e),
                }
            });

            // Reap finished tasks so the set stays bounded on long sessions
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    warn!("Request task failed: {}", e);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Request task failed: {}", e);
            }
        }

        drop(tx);
        writer_task.await.map_err(io::Error::other)??;

        info!("Input closed after {} requests", received);
        Ok(())
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        debug!("Sent response ({} bytes)", line.len());
    }
    writer.shutdown().await
}
