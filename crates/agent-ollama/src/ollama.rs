//! Ollama Completer
//!
//! Implementation of `Completer` for local Ollama inference.

use agent_core::{AgentError, Completer, Message, Result, Role};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, MessageRole, request::ChatMessageRequest},
    models::ModelOptions,
};

/// Ollama completer configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Model identifier (e.g. "mistral:7b", "llama3.2")
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            model: "mistral:7b".into(),
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("OLLAMA_HOST").unwrap_or(defaults.host),
            port: std::env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
        }
    }
}

/// Ollama-backed completer
pub struct OllamaCompleter {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaCompleter {
    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OllamaConfig::from_env())
    }

    /// The configured model
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check if the backend is reachable
    pub async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Convert agent messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }
}

#[async_trait]
impl Completer for OllamaCompleter {
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String> {
        let request = ChatMessageRequest::new(
            self.config.model.clone(),
            Self::convert_messages(messages),
        )
        .options(ModelOptions::default().temperature(temperature));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::Completion(e.to_string()))?;

        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
        assert_eq!(config.model, "mistral:7b");
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![Message::system("You are helpful."), Message::user("Hello")];

        let converted = OllamaCompleter::convert_messages(&messages);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[1].content, "Hello");
    }
}
