//! LLM backend abstraction for reposcribe
//!
//! A trait-based system for invoking the external text-generation oracle
//! over HTTP. Both the ranking call (selection) and the summarization call
//! go through the same [`LlmBackend`] trait, so the pipeline works with any
//! provider without knowing wire details. Calls are never retried here: the
//! selector has its own deterministic fallback, and a failed summarization
//! is terminal.

mod anthropic_backend;
pub(crate) mod http_client;
mod openai_backend;
pub mod prompts;
mod types;

pub use reposcribe_utils::error::LlmError;
pub use types::{LlmBackend, LlmReply, LlmRequest, Message, Role};

pub(crate) use anthropic_backend::AnthropicBackend;
pub(crate) use openai_backend::OpenAiBackend;

use reposcribe_config::LlmConfig;

/// Create an LLM backend from configuration.
///
/// `override_api_key` is the request-level credential: when present it takes
/// precedence over the environment variable named in configuration. This
/// lets a caller supply their own key for a single run without touching
/// process state.
///
/// # Errors
///
/// Returns [`LlmError::Unsupported`] for an unknown provider and
/// [`LlmError::Misconfiguration`] when provider settings are incomplete
/// (missing API key, missing model). Construction failures surface before
/// any clone or network cost is spent.
pub fn backend_from_config(
    config: &LlmConfig,
    override_api_key: Option<&str>,
) -> Result<Box<dyn LlmBackend>, LlmError> {
    match config.provider() {
        "openai" => {
            let backend = OpenAiBackend::new_from_config(config, override_api_key)?;
            Ok(Box::new(backend))
        }
        "anthropic" => {
            let backend = AnthropicBackend::new_from_config(config, override_api_key)?;
            Ok(Box::new(backend))
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: openai, anthropic.",
        ))),
    }
}
