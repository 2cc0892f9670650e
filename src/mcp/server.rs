//! MCP server: newline-delimited JSON-RPC over an async reader/writer pair.
//!
//! Every request runs on its own task. Responses are funnelled through a
//! channel to a single writer task so frames never interleave.

use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::mcp::framing::{read_frame, Frame};
use crate::mcp::protocol::{
    CallToolParams, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::tools::{Dispatcher, ToolEntry};
use crate::types::{
    Error, TransportConfig, RPC_INVALID_REQUEST, RPC_METHOD_NOT_FOUND, RPC_PARSE_ERROR,
};
use serde_json::{json, Value};

const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// MCP server wrapping the dispatcher.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    transport: TransportConfig,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_transport(dispatcher, TransportConfig::default())
    }

    pub fn with_transport(dispatcher: Arc<Dispatcher>, transport: TransportConfig) -> Self {
        Self {
            dispatcher,
            transport,
            cancel: CancellationToken::new(),
        }
    }

    /// Serve on the process's stdin/stdout.
    pub async fn serve_stdio(&self) -> io::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Run until the reader hits EOF, a read fails, or shutdown is requested.
    /// In-flight requests are allowed to finish and flush before this returns.
    /// Undecodable or oversized lines are answered and skipped.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(RESPONSE_CHANNEL_CAPACITY);
        let writer_task = tokio::spawn(write_frames(writer, rx));
        let max_line_bytes = self.transport.max_line_bytes;

        tracing::info!("MCP server ready ({} tools)", self.dispatcher.catalog().len());

        let read_outcome = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("MCP server shutting down");
                    break Ok(());
                }
                frame = read_frame(&mut reader, max_line_bytes) => {
                    let line = match frame {
                        Ok(Frame::Line(line)) => line,
                        Ok(Frame::Eof) => {
                            tracing::debug!("input closed");
                            break Ok(());
                        }
                        Ok(Frame::Oversized(len)) => {
                            tracing::warn!(len, max_line_bytes, "request line too large");
                            let response = JsonRpcResponse::error(
                                Value::Null,
                                RPC_INVALID_REQUEST,
                                format!("Request too large: {} bytes (max {})", len, max_line_bytes),
                            );
                            send_response(&tx, &response).await;
                            continue;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "stdin read failed");
                            break Err(e);
                        }
                    };
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }

                    let dispatcher = self.dispatcher.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(response) = handle_frame(&dispatcher, &line).await {
                            send_response(&tx, &response).await;
                        }
                    });
                }
            }
        };

        drop(tx);
        let write_outcome = writer_task
            .await
            .map_err(|e| io::Error::other(format!("writer task failed: {}", e)))?;
        read_outcome.and(write_outcome)
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

async fn send_response(tx: &mpsc::Sender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(frame) => {
            if tx.send(frame).await.is_err() {
                tracing::warn!("response dropped: writer closed");
            }
        }
        Err(e) => tracing::error!("response encoding failed: {}", e),
    }
}

async fn write_frames<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        writer.write_all(frame.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

fn parse_error(detail: impl std::fmt::Display) -> JsonRpcResponse {
    JsonRpcResponse::error(Value::Null, RPC_PARSE_ERROR, format!("Parse error: {}", detail))
}

/// Decode one raw frame and handle it. Frames that are not UTF-8 get a parse
/// error with a null id.
pub async fn handle_frame(dispatcher: &Dispatcher, frame: &[u8]) -> Option<JsonRpcResponse> {
    match std::str::from_utf8(frame) {
        Ok(line) => handle_line(dispatcher, line).await,
        Err(e) => Some(parse_error(e)),
    }
}

/// Decode one line and handle it. `None` means no response is owed.
pub async fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<JsonRpcResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Some(parse_error(Error::from(e))),
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => handle_request(dispatcher, request).await,
        Err(e) => Some(JsonRpcResponse::error(
            id,
            RPC_INVALID_REQUEST,
            format!("Invalid request: {}", e),
        )),
    }
}

/// Route one JSON-RPC request by method.
pub async fn handle_request(
    dispatcher: &Dispatcher,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        tracing::debug!(method = %request.method, "notification");
        return None;
    }
    let id = request.id.unwrap_or(Value::Null);

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => {
            let tools: Vec<Value> = dispatcher
                .catalog()
                .list_entries()
                .into_iter()
                .map(ToolEntry::to_definition)
                .collect();
            JsonRpcResponse::success(id, json!({ "tools": tools }))
        }
        "tools/call" => match serde_json::from_value::<CallToolParams>(request.params) {
            Ok(params) => {
                let envelope = dispatcher.call(&params.name, &params.arguments).await;
                match serde_json::to_value(envelope) {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(e) => {
                        let err = Error::internal(e.to_string());
                        JsonRpcResponse::error(id, err.to_rpc_code(), err.to_string())
                    }
                }
            }
            Err(e) => {
                let err = Error::invalid_parameter("params", e.to_string());
                JsonRpcResponse::error(id, err.to_rpc_code(), err.to_string())
            }
        },
        other => JsonRpcResponse::error(
            id,
            RPC_METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
        ),
    };

    Some(response)
}
