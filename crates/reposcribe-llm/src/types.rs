//! Core types for the LLM backend abstraction.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reposcribe_utils::error::LlmError;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instruction text.
    System,
    /// Payload (path list or context document).
    User,
    /// Model output, when echoing a conversation back.
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Input to a single backend invocation.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Model override; empty means the backend's configured default.
    pub model: String,
    /// Blocking timeout for this call.
    pub timeout: Duration,
    /// Ordered conversation messages.
    pub messages: Vec<Message>,
    /// Completion token cap override.
    pub max_tokens: Option<u32>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Create a request using the backend's default model and parameters.
    #[must_use]
    pub fn new(timeout: Duration, messages: Vec<Message>) -> Self {
        Self {
            model: String::new(),
            timeout,
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Override the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Result of a backend invocation.
#[derive(Debug, Clone)]
pub struct LlmReply {
    /// Raw response text; passed through to callers unmodified.
    pub text: String,
    /// Provider name that produced the reply.
    pub provider: String,
    /// Model that was actually used.
    pub model: String,
    /// Input tokens consumed, when the provider reports them.
    pub tokens_input: Option<u64>,
    /// Output tokens generated, when the provider reports them.
    pub tokens_output: Option<u64>,
}

/// Trait implemented by every provider backend.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Invoke the model once. Blocking for the duration of the call; never
    /// retried by the core.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] for transport failures, provider errors (auth,
    /// quota, outage), and timeouts.
    async fn invoke(&self, request: LlmRequest) -> Result<LlmReply, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("a").role, Role::System);
        assert_eq!(Message::user("b").role, Role::User);
        assert_eq!(Message::user("b").content, "b");
    }

    #[test]
    fn request_defaults_to_backend_model() {
        let req = LlmRequest::new(Duration::from_secs(30), vec![Message::user("hi")]);
        assert!(req.model.is_empty());
        assert!(req.max_tokens.is_none());
        assert!(req.temperature.is_none());

        let req = req.with_temperature(0.3);
        assert_eq!(req.temperature, Some(0.3));
    }
}
