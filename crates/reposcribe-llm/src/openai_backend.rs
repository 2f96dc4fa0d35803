//! OpenAI HTTP backend implementation.
//!
//! Speaks the chat-completions wire format against the OpenAI API (or any
//! compatible endpoint configured via `base_url`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reposcribe_config::LlmConfig;
use reposcribe_utils::error::LlmError;

use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmReply, LlmRequest, Message, Role};

/// Default OpenAI API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model when configuration leaves it unset.
const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI backend configuration.
pub(crate) struct OpenAiBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    default_model: String,
    default_max_tokens: Option<u32>,
    default_temperature: Option<f32>,
}

impl OpenAiBackend {
    /// Create a backend from configuration.
    ///
    /// `override_api_key` takes precedence over the environment variable
    /// named in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] when no API key can be
    /// resolved or the HTTP client cannot be constructed.
    pub fn new_from_config(
        config: &LlmConfig,
        override_api_key: Option<&str>,
    ) -> Result<Self, LlmError> {
        let section = config.openai.as_ref();

        let api_key = match override_api_key {
            Some(key) => key.to_string(),
            None => {
                let api_key_env = section
                    .and_then(|s| s.api_key_env.as_deref())
                    .unwrap_or("OPENAI_API_KEY");
                std::env::var(api_key_env).map_err(|_| {
                    LlmError::Misconfiguration(format!(
                        "OpenAI API key not found in environment variable '{api_key_env}'. \
                         Set this variable, configure api_key_env in [llm.openai], or pass a \
                         request-level key.",
                    ))
                })?
            }
        };

        Ok(Self {
            client: HttpClient::new()?,
            base_url: section
                .and_then(|s| s.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model: section
                .and_then(|s| s.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_max_tokens: section.and_then(|s| s.max_tokens),
            default_temperature: section.and_then(|s| s.temperature),
        })
    }

    /// Resolve per-invocation parameters: request overrides win, then
    /// configured defaults, then provider defaults (omitted fields).
    fn resolve_params(&self, request: &LlmRequest) -> (String, Option<u32>, Option<f32>) {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };
        let max_tokens = request.max_tokens.or(self.default_max_tokens);
        let temperature = request.temperature.or(self.default_temperature);
        (model, max_tokens, temperature)
    }

    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|msg| ChatMessage {
                role: match msg.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: Some(msg.content.clone()),
            })
            .collect()
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmReply, LlmError> {
        let (model, max_tokens, temperature) = self.resolve_params(&request);

        debug!(
            provider = "openai",
            model = %model,
            timeout_secs = request.timeout.as_secs(),
            "invoking OpenAI backend"
        );

        let body = ChatCompletionRequest {
            model: model.clone(),
            messages: Self::convert_messages(&request.messages),
            max_tokens,
            temperature,
        };

        let http_request = reqwest::Client::new()
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .client
            .execute(http_request, request.timeout, "openai")
            .await?;

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse OpenAI response: {e}")))?;

        let choice = response_body
            .choices
            .first()
            .ok_or_else(|| LlmError::Transport("OpenAI response missing choices[0]".to_string()))?;

        let text = choice.message.content.clone().ok_or_else(|| {
            LlmError::Transport("OpenAI response missing content in choices[0]".to_string())
        })?;

        let mut reply = LlmReply {
            text,
            provider: "openai".to_string(),
            model,
            tokens_input: None,
            tokens_output: None,
        };
        if let Some(usage) = response_body.usage {
            reply.tokens_input = Some(usage.prompt_tokens);
            reply.tokens_output = Some(usage.completion_tokens);
        }

        debug!(
            provider = "openai",
            tokens_input = ?reply.tokens_input,
            tokens_output = ?reply.tokens_output,
            "OpenAI invocation completed"
        );

        Ok(reply)
    }
}

/// Chat-completions message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat-completions response body.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
