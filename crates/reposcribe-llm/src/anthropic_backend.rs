//! Anthropic HTTP backend implementation.
//!
//! Speaks the Messages API wire format. Anthropic keeps system prompts out
//! of the messages array, so conversion splits them off into the dedicated
//! `system` field.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reposcribe_config::LlmConfig;
use reposcribe_utils::error::LlmError;

use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmReply, LlmRequest, Message, Role};

/// Default Anthropic API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires an explicit completion cap.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic backend configuration.
pub(crate) struct AnthropicBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    default_model: String,
    default_max_tokens: u32,
    default_temperature: Option<f32>,
}

impl AnthropicBackend {
    /// Create a backend from configuration.
    ///
    /// `override_api_key` takes precedence over the environment variable
    /// named in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] when no API key can be
    /// resolved, the model is unset, or the HTTP client cannot be
    /// constructed.
    pub fn new_from_config(
        config: &LlmConfig,
        override_api_key: Option<&str>,
    ) -> Result<Self, LlmError> {
        let section = config.anthropic.as_ref();

        let api_key = match override_api_key {
            Some(key) => key.to_string(),
            None => {
                let api_key_env = section
                    .and_then(|s| s.api_key_env.as_deref())
                    .unwrap_or("ANTHROPIC_API_KEY");
                std::env::var(api_key_env).map_err(|_| {
                    LlmError::Misconfiguration(format!(
                        "Anthropic API key not found in environment variable '{api_key_env}'. \
                         Set this variable, configure api_key_env in [llm.anthropic], or pass a \
                         request-level key.",
                    ))
                })?
            }
        };

        let default_model = section.and_then(|s| s.model.clone()).ok_or_else(|| {
            LlmError::Misconfiguration(
                "Anthropic model not specified in configuration. \
                 Set [llm.anthropic] model = \"model-name\"."
                    .to_string(),
            )
        })?;

        Ok(Self {
            client: HttpClient::new()?,
            base_url: section
                .and_then(|s| s.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model,
            default_max_tokens: section.and_then(|s| s.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS),
            default_temperature: section.and_then(|s| s.temperature),
        })
    }

    fn resolve_params(&self, request: &LlmRequest) -> (String, u32, Option<f32>) {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };
        let max_tokens = request.max_tokens.unwrap_or(self.default_max_tokens);
        let temperature = request.temperature.or(self.default_temperature);
        (model, max_tokens, temperature)
    }

    /// Split system messages into the `system` field; user and assistant
    /// messages stay in the conversation array. Multiple system messages
    /// are concatenated.
    fn convert_messages(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system_prompt: Option<String> = None;
        let mut anthropic_messages = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => {
                    if let Some(existing) = system_prompt.as_mut() {
                        existing.push_str("\n\n");
                        existing.push_str(&msg.content);
                    } else {
                        system_prompt = Some(msg.content.clone());
                    }
                }
                Role::User => anthropic_messages.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: msg.content.clone(),
                }),
                Role::Assistant => anthropic_messages.push(AnthropicMessage {
                    role: "assistant".to_string(),
                    content: msg.content.clone(),
                }),
            }
        }

        (system_prompt, anthropic_messages)
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmReply, LlmError> {
        let (model, max_tokens, temperature) = self.resolve_params(&request);

        debug!(
            provider = "anthropic",
            model = %model,
            max_tokens = max_tokens,
            timeout_secs = request.timeout.as_secs(),
            "invoking Anthropic backend"
        );

        let (system, messages) = Self::convert_messages(&request.messages);

        let body = AnthropicRequest {
            model: model.clone(),
            messages,
            max_tokens,
            temperature,
            system,
        };

        let http_request = reqwest::Client::new()
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let response = self
            .client
            .execute(http_request, request.timeout, "anthropic")
            .await?;

        let response_body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse Anthropic response: {e}")))?;

        let text: String = response_body
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(LlmError::Transport(
                "Anthropic response missing text content".to_string(),
            ));
        }

        let mut reply = LlmReply {
            text,
            provider: "anthropic".to_string(),
            model,
            tokens_input: None,
            tokens_output: None,
        };
        if let Some(usage) = response_body.usage {
            reply.tokens_input = Some(usage.input_tokens);
            reply.tokens_output = Some(usage.output_tokens);
        }

        Ok(reply)
    }
}

/// Messages API message.
#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

/// Messages API request body.
#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Messages API response body.
#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
