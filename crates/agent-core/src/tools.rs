//! Tool Provider Seam
//!
//! The external capability that lists available tools and executes
//! them by name. In production this is an MCP client talking to a
//! spawned server process; tests substitute in-memory stubs.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::catalog::ToolDescriptor;
use crate::error::Result;

/// Arguments for a tool invocation, as decoded from the model's action
pub type ToolArgs = HashMap<String, serde_json::Value>;

/// Result of a tool invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolOutput {
    /// Primary textual payload, appended verbatim into history
    pub text: String,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Capability trait for remote tool hosts.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Discover the available tools. Called once at session start.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Execute a tool by name.
    async fn call(&self, name: &str, args: &ToolArgs) -> Result<ToolOutput>;
}
