//! MCP Client
//!
//! Spawns an MCP server as a child process and speaks line-delimited
//! JSON-RPC over its stdio. Implements the agent's [`ToolProvider`]
//! capability: tool discovery at session start, tool execution during
//! the loop. One reader task resolves responses to pending requests by
//! id; requests are written under a lock, so the client is safe to
//! share behind an `Arc`.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, oneshot};

use agent_core::{AgentError, ToolArgs, ToolDescriptor, ToolOutput, ToolProvider};

use crate::error::McpError;
use crate::protocol::{
    InitializeResult, Notification, PROTOCOL_VERSION, Request, Response, ServerMessage,
    ToolCallResult, ToolsListResult,
};

/// Pending request map: request id to response waiter
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Response>>>>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// A connection to one spawned MCP server.
///
/// The child is killed when the client is dropped, so collaborator
/// connections are released on every exit path, error paths included.
pub struct McpClient {
    child: Mutex<Child>,
    stdin: Mutex<ChildStdin>,
    pending: Pending,
    next_id: AtomicU64,
    request_timeout: Duration,
}

impl McpClient {
    /// Spawn the server process and perform the initialize handshake.
    pub async fn spawn(command: &str, args: &[String]) -> Result<Self, McpError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(McpError::Spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::Protocol("child stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::Protocol("child stdout unavailable".into()))?;

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        tokio::spawn(read_frames(stdout, pending.clone()));

        let client = Self {
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            pending,
            next_id: AtomicU64::new(1),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };

        client.initialize().await?;
        Ok(client)
    }

    /// Run the MCP initialize handshake.
    async fn initialize(&self) -> Result<(), McpError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        let result = self.request("initialize", Some(params)).await?;
        let init: InitializeResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("bad initialize result: {e}")))?;

        if let Some(server) = &init.server_info {
            tracing::info!(
                server = %server.name,
                version = server.version.as_deref().unwrap_or("?"),
                protocol = %init.protocol_version,
                "MCP server initialized"
            );
        }

        self.notify("notifications/initialized", None).await
    }

    /// Send a request and wait for its response.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, tx);
        }

        if let Err(e) = self.send(&Request::new(id, method, params)).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        let response = match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(McpError::Closed(method.to_string())),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(McpError::Timeout(method.to_string()));
            }
        };

        if let Some(error) = response.error {
            return Err(McpError::Rpc {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Send a notification (no response expected).
    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), McpError> {
        self.send(&Notification::new(method, params)).await
    }

    /// Write one frame as a single line.
    async fn send<T: serde::Serialize>(&self, frame: &T) -> Result<(), McpError> {
        let mut line = serde_json::to_string(frame)
            .map_err(|e| McpError::Protocol(format!("unserializable frame: {e}")))?;
        line.push('\n');

        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(McpError::Send)?;
        stdin.flush().await.map_err(McpError::Send)
    }

    /// Terminate the server process.
    pub async fn shutdown(&self) {
        let mut child = self.child.lock().await;
        if let Err(e) = child.kill().await {
            tracing::debug!(error = %e, "MCP server already gone");
        }
    }
}

/// Reader task: one JSON frame per line, responses resolved by id.
async fn read_frames(stdout: tokio::process::ChildStdout, pending: Pending) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match ServerMessage::parse(line) {
                    Ok(ServerMessage::Response(response)) => {
                        let waiter = pending.lock().await.remove(&response.id);
                        if let Some(waiter) = waiter {
                            let _ = waiter.send(response);
                        } else {
                            tracing::warn!(id = response.id, "response for unknown request id");
                        }
                    }
                    Ok(ServerMessage::Notification { method }) => {
                        tracing::debug!(%method, "MCP notification");
                    }
                    Ok(ServerMessage::Request { method }) => {
                        tracing::warn!(%method, "unexpected request from MCP server");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping malformed MCP frame");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "MCP stdout read failed");
                break;
            }
        }
    }
    // Server went away: wake every waiter with a closed channel.
    pending.lock().await.clear();
    tracing::debug!("MCP reader task finished");
}

#[async_trait]
impl ToolProvider for McpClient {
    async fn list_tools(&self) -> agent_core::Result<Vec<ToolDescriptor>> {
        let result = self
            .request("tools/list", None)
            .await
            .map_err(|e| AgentError::Protocol(e.to_string()))?;

        let listing: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| AgentError::Protocol(format!("bad tools/list result: {e}")))?;

        Ok(listing
            .tools
            .into_iter()
            .map(crate::protocol::McpTool::into_descriptor)
            .collect())
    }

    async fn call(&self, name: &str, args: &ToolArgs) -> agent_core::Result<ToolOutput> {
        let params = json!({
            "name": name,
            "arguments": args,
        });

        let result = self
            .request("tools/call", Some(params))
            .await
            .map_err(|e| AgentError::ToolExecution(e.to_string()))?;

        let call_result: ToolCallResult = serde_json::from_value(result)
            .map_err(|e| AgentError::ToolExecution(format!("bad tools/call result: {e}")))?;

        Ok(ToolOutput::new(call_result.text()))
    }
}
