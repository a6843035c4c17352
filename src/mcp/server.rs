//! Stdio MCP server — read loop, per-call tasks, single writer.
//!
//! Messages are newline-delimited JSON. Tool calls run concurrently (bounded by
//! `max_in_flight`) and their replies are funnelled through one writer task,
//! so replies may leave in a different order than requests arrived.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::protocol::{JsonRpcResponse, INTERNAL_ERROR, INVALID_REQUEST};
use super::router::{route, Routed};
use crate::gateway::Gateway;
use crate::types::ServerConfig;

/// Capacity of the reply channel feeding the writer task.
const REPLY_CHANNEL_CAPACITY: usize = 64;

/// MCP server wrapping the gateway.
#[derive(Debug)]
pub struct McpServer {
    gateway: Arc<Gateway>,
    config: ServerConfig,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(gateway: Gateway, config: ServerConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Serve on the process's stdin/stdout until EOF or shutdown.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Serve on an arbitrary reader/writer pair until EOF or shutdown.
    ///
    /// In-flight tool calls are drained before returning.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(REPLY_CHANNEL_CAPACITY);
        let writer_task = tokio::spawn(write_replies(writer, rx));
        let slots = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut calls = JoinSet::new();

        tracing::info!(
            "MCP server reading requests (max_in_flight={})",
            self.config.max_in_flight
        );

        let mut read_error = None;
        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("MCP server shutting down");
                    break;
                }
                next = read_line(&mut reader, self.config.max_line_bytes) => next,
            };

            let line = match next {
                Ok(Line::Eof) => {
                    tracing::info!("stdin closed");
                    break;
                }
                Ok(Line::Message(line)) => line,
                Ok(Line::TooLong) => {
                    tracing::warn!(
                        "Inbound message exceeds {} bytes, discarded",
                        self.config.max_line_bytes
                    );
                    let reply = JsonRpcResponse::error(None, INVALID_REQUEST, "Message too large");
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                    continue;
                }
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match route(&line, &self.gateway, &self.config) {
                Routed::Ignore => {}
                Routed::Reply(reply) => {
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Routed::Call { id, call } => {
                    // All slots busy must not hide a shutdown request.
                    let permit = tokio::select! {
                        _ = self.cancel.cancelled() => {
                            tracing::info!("MCP server shutting down, dropping queued tool call");
                            break;
                        }
                        acquired = slots.clone().acquire_owned() => match acquired {
                            Ok(permit) => permit,
                            Err(_) => break,
                        },
                    };
                    let gateway = self.gateway.clone();
                    let tx = tx.clone();
                    calls.spawn(async move {
                        tracing::debug!(tool = %call.name, "tool call started");
                        let result = gateway.dispatch(call).await;
                        let reply = match serde_json::to_value(&result) {
                            Ok(v) => JsonRpcResponse::success(id, v),
                            Err(e) => JsonRpcResponse::error(
                                id,
                                INTERNAL_ERROR,
                                format!("Serialization error: {}", e),
                            ),
                        };
                        if tx.send(reply).await.is_err() {
                            tracing::warn!("writer gone, dropping tool result");
                        }
                        drop(permit);
                    });
                }
            }

            // Reap finished calls so the set does not grow unbounded.
            while let Some(joined) = calls.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = calls.join_next().await {
            log_join(joined);
        }
        drop(tx);

        let write_result = match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())),
        };

        match read_error {
            Some(e) => Err(e),
            None => write_result,
        }
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Token that triggers shutdown when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// One inbound read.
enum Line {
    Message(String),
    TooLong,
    Eof,
}

/// Read one newline-terminated message of at most `max` bytes.
///
/// An oversized message is consumed up to and including its newline so the
/// next read starts on a fresh message.
async fn read_line<R>(reader: &mut R, max: usize) -> std::io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(Line::Eof);
    }
    if buf.last() != Some(&b'\n') && buf.len() > max {
        skip_to_newline(reader).await?;
        return Ok(Line::TooLong);
    }
    let text = String::from_utf8_lossy(&buf);
    Ok(Line::Message(text.trim_end_matches(['\r', '\n']).to_string()))
}

async fn skip_to_newline<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        let (consumed, found) = match available.iter().position(|b| *b == b'\n') {
            Some(i) => (i + 1, true),
            None => (available.len(), false),
        };
        reader.consume(consumed);
        if found {
            return Ok(());
        }
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!("tool call task failed: {}", e);
    }
}

/// Write each reply as one JSON line, flushing after every message.
async fn write_replies<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        let mut encoded = match serde_json::to_vec(&reply) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Reply encoding failed: {}", e);
                continue;
            }
        };
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
