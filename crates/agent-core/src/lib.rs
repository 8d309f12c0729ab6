//! # agent-core
//!
//! Core loop for a chat agent that drives MCP tools from model output.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ ActionParser │  │  ToolCatalog │  │ Completer /       │  │
//! │  │ (repair      │──│  (discovered │──│ ToolProvider      │  │
//! │  │  chain)      │  │   metadata)  │  │ (collaborators)   │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model speaks a one-JSON-object-per-turn protocol: each response
//! is either a tool call or a final answer. `ActionParser` turns the
//! raw (and often malformed) model text into exactly one [`Action`];
//! [`Agent::run_turn`] dispatches it and folds the result back into
//! the [`ConversationHistory`] until the model answers or the
//! iteration budget runs out.

pub mod action;
pub mod agent;
pub mod catalog;
pub mod completer;
pub mod error;
pub mod history;
pub mod prompt;
pub mod tools;

pub use action::{Action, ActionParser};
pub use agent::{Agent, AgentConfig, TurnOutcome};
pub use catalog::{ToolCatalog, ToolDescriptor, ToolParameter};
pub use completer::Completer;
pub use error::{AgentError, Result};
pub use history::{ConversationHistory, Message, Role};
pub use tools::{ToolArgs, ToolOutput, ToolProvider};
