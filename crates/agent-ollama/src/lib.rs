//! # agent-ollama
//!
//! Completer backend for local Ollama inference.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_ollama::OllamaCompleter;
//!
//! let completer = OllamaCompleter::from_env();
//! let text = completer.complete(history.snapshot(), 0.2).await?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaCompleter, OllamaConfig};
