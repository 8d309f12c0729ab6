//! # agent-mcp
//!
//! MCP (Model Context Protocol) stdio client for the agent loop.
//!
//! Spawns a tool-hosting server as a subprocess, runs the initialize
//! handshake, discovers tools for the session catalog, and executes
//! tool calls on behalf of [`agent_core`]'s `ToolProvider` seam.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_mcp::McpClient;
//!
//! let client = McpClient::spawn("python", &["server_fun.py".into()]).await?;
//! let descriptors = client.list_tools().await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;

pub use client::McpClient;
pub use error::McpError;
