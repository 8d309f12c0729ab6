//! Error Types

use thiserror::Error;

/// MCP client error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Server process could not be spawned
    #[error("Failed to spawn MCP server: {0}")]
    Spawn(std::io::Error),

    /// Writing a frame to the server failed
    #[error("Failed to send to MCP server: {0}")]
    Send(std::io::Error),

    /// Malformed frame from the server
    #[error("Frame error: {0}")]
    Frame(String),

    /// The server returned a JSON-RPC error object
    #[error("RPC error {code} for {method}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// The server closed the connection before responding
    #[error("Connection closed while awaiting {0}")]
    Closed(String),

    /// No response within the request timeout
    #[error("Request timeout for {0}")]
    Timeout(String),

    /// Unexpected result payload
    #[error("Protocol error: {0}")]
    Protocol(String),
}
