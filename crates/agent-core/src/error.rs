//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Completion request failed (fatal to the current turn)
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Model backend unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Two discovered tools share a name (fatal at session start)
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Tool execution failed (recovered into history by the loop)
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Wire protocol violation from a collaborator
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
