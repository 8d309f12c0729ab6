//! Agent Loop
//!
//! Drives one user turn: completion, action parsing, dispatch, and
//! history bookkeeping, bounded by the iteration budget. The loop is
//! strictly sequential: each iteration's prompt depends on the full
//! effect of the previous iteration's appended message.

use std::sync::Arc;

use crate::action::{Action, ActionParser};
use crate::catalog::ToolCatalog;
use crate::completer::Completer;
use crate::error::Result;
use crate::history::{ConversationHistory, Message};
use crate::tools::ToolProvider;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Maximum decision/dispatch steps per user turn
    pub max_iterations: usize,

    /// Sampling temperature for loop completions
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 6,
            temperature: 0.2,
        }
    }
}

/// Terminal state of one user turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer
    Answered(String),

    /// The iteration budget ran out before a final answer. Not an
    /// error: the session boundary reports it distinctly so the user
    /// knows the task did not complete.
    BudgetExhausted,
}

/// The per-session agent: one catalog, one history, one sequential loop.
pub struct Agent {
    completer: Arc<dyn Completer>,
    tools: Arc<dyn ToolProvider>,
    catalog: ToolCatalog,
    parser: ActionParser,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        completer: Arc<dyn Completer>,
        tools: Arc<dyn ToolProvider>,
        catalog: ToolCatalog,
        config: AgentConfig,
    ) -> Self {
        Self {
            completer,
            tools,
            catalog,
            parser: ActionParser::new(),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(
        completer: Arc<dyn Completer>,
        tools: Arc<dyn ToolProvider>,
        catalog: ToolCatalog,
    ) -> Self {
        Self::new(completer, tools, catalog, AgentConfig::default())
    }

    /// Get the tool catalog
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run one user turn to resolution.
    ///
    /// Appends the user message, then iterates decision/dispatch steps
    /// up to the configured budget. A completer failure aborts the
    /// turn with an error and appends nothing further; unknown tools
    /// and tool failures are reported into history and the loop
    /// continues, giving the model a chance to adapt.
    pub async fn run_turn(
        &self,
        history: &mut ConversationHistory,
        user_text: &str,
    ) -> Result<TurnOutcome> {
        history.append(Message::user(user_text));

        for iteration in 0..self.config.max_iterations {
            let raw = self
                .completer
                .complete(history.snapshot(), self.config.temperature)
                .await?;

            match self.parser.parse(&raw, self.completer.as_ref()).await {
                Action::FinalAnswer { text } => {
                    history.append(Message::assistant(&text));
                    return Ok(TurnOutcome::Answered(text));
                }
                Action::ToolCall { name, args } => {
                    if self.catalog.get(&name).is_none() {
                        tracing::warn!(tool = %name, "model requested unknown tool");
                        history.append(Message::assistant(format!("(unknown tool {name})")));
                        continue;
                    }

                    tracing::debug!(tool = %name, iteration, "dispatching tool call");
                    match self.tools.call(&name, &args).await {
                        Ok(output) => {
                            history.append(Message::assistant(format!(
                                "[tool:{name}] {}",
                                output.text
                            )));
                        }
                        Err(e) => {
                            tracing::warn!(tool = %name, error = %e, "tool call failed");
                            history.append(Message::assistant(format!(
                                "[error] Tool call failed: {e}"
                            )));
                        }
                    }
                }
            }
        }

        Ok(TurnOutcome::BudgetExhausted)
    }
}
