//! MCP Wire Protocol
//!
//! Line-delimited JSON-RPC 2.0 frames and the MCP payloads the agent
//! needs: `initialize`, `tools/list`, and `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use agent_core::{ToolDescriptor, ToolParameter};

use crate::error::McpError;

/// JSON-RPC version string on every frame
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this client speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Outgoing request frame
#[derive(Debug, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// Outgoing notification frame (no id, no response expected)
#[derive(Debug, Serialize)]
pub struct Notification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
        }
    }
}

/// Error object inside a response frame
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// Incoming response frame
#[derive(Debug, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// One incoming frame from the server
#[derive(Debug)]
pub enum ServerMessage {
    /// Reply to one of our requests
    Response(Response),
    /// Server-initiated notification (logged, otherwise ignored)
    Notification { method: String },
    /// Server-initiated request (unsupported by this client)
    Request { method: String },
}

impl ServerMessage {
    /// Classify one line of server output.
    pub fn parse(line: &str) -> Result<Self, McpError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| McpError::Frame(format!("invalid JSON frame: {e}")))?;

        let has_id = value.get("id").is_some_and(|id| !id.is_null());
        match value.get("method").and_then(Value::as_str) {
            Some(method) if has_id => Ok(Self::Request {
                method: method.to_string(),
            }),
            Some(method) => Ok(Self::Notification {
                method: method.to_string(),
            }),
            None => {
                let response: Response = serde_json::from_value(value)
                    .map_err(|e| McpError::Frame(format!("malformed response frame: {e}")))?;
                Ok(Self::Response(response))
            }
        }
    }
}

/// Server identity from the initialize handshake
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Result of the `initialize` request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

/// A tool as advertised by `tools/list`
#[derive(Debug, Clone, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Option<Value>,
}

impl McpTool {
    /// Flatten the JSON Schema `properties`/`required` pair into the
    /// catalog's parameter list, keeping the schema's property order.
    pub fn into_descriptor(self) -> ToolDescriptor {
        let mut parameters = Vec::new();

        if let Some(schema) = &self.input_schema {
            let required: Vec<&str> = schema
                .get("required")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, info) in properties {
                    let param_type = info
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("any")
                        .to_string();
                    parameters.push(ToolParameter {
                        name: name.clone(),
                        param_type,
                        required: required.contains(&name.as_str()),
                    });
                }
            }
        }

        ToolDescriptor {
            name: self.name,
            description: self.description.unwrap_or_default(),
            parameters,
        }
    }
}

/// Result of `tools/list`
#[derive(Debug, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpTool>,
}

/// One content item of a tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Result of `tools/call`
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolCallResult {
    /// Primary textual payload: the first text content item, falling
    /// back to the serialized result when the server sent none.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .find_map(|item| item.text.clone())
            .unwrap_or_else(|| serde_json::to_string(self).unwrap_or_default())
    }
}
