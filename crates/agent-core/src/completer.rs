//! Completer Seam
//!
//! The external capability that turns a conversation history into the
//! next model-generated text. The loop (and the parser's repair step)
//! work exclusively through this trait, so backends can be swapped
//! without touching agent logic.

use async_trait::async_trait;

use crate::error::Result;
use crate::history::Message;

/// Strategy trait for model backends.
///
/// Implementations must fail, not hang silently, when the backend is
/// unavailable; the loop imposes no timeout of its own.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Generate the next model text for the given ordered messages.
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String>;
}
