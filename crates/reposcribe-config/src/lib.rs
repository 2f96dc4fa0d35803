//! Configuration management for reposcribe
//!
//! Hierarchical configuration with precedence: explicit path > the
//! `REPOSCRIBE_CONFIG` environment variable > `./reposcribe.toml` > built-in
//! defaults. Configuration files use TOML with `[limits]`, `[llm]`, and
//! `[server]` sections:
//!
//! ```toml
//! [limits]
//! max_context_tokens = 100000
//!
//! [llm]
//! provider = "openai"
//!
//! [llm.openai]
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [server]
//! listen = "0.0.0.0:8000"
//! ```
//!
//! API keys are never stored in configuration: the file names an environment
//! variable, the backend reads it at construction time.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reposcribe_utils::error::ConfigError;

/// Token ceiling for the assembled context document.
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 100_000;

/// Per-file byte ceiling applied by the scanner.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100_000;

/// Maximum number of files the importance selector may keep.
pub const DEFAULT_SELECTION_CAP: usize = 20;

/// Minimum token allowance per trimmable file under fair-share allocation.
pub const DEFAULT_SHARE_FLOOR_TOKENS: usize = 200;

/// Default timeout for a single LLM call.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Default HTTP server bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Resolved configuration, passed by reference into every component.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Pipeline size limits.
    #[serde(default)]
    pub limits: Limits,
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration with discovery.
    ///
    /// Precedence: `explicit_path` (must exist) > `REPOSCRIBE_CONFIG` env
    /// var (must exist) > `./reposcribe.toml` (optional) > defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when an explicitly named file is
    /// missing, or [`ConfigError::InvalidFile`] when a file fails to parse.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var("REPOSCRIBE_CONFIG") {
            return Self::from_file(Path::new(&path));
        }
        let local = PathBuf::from("reposcribe.toml");
        if local.exists() {
            return Self::from_file(&local);
        }
        Ok(Self::default())
    }

    /// Parse configuration from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] or [`ConfigError::InvalidFile`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            ConfigError::InvalidFile { reason, .. } => ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFile`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidFile {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pipeline size limits. Unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Limits {
    pub max_context_tokens: Option<usize>,
    pub max_file_bytes: Option<u64>,
    pub selection_cap: Option<usize>,
    pub share_floor_tokens: Option<usize>,
}

impl Limits {
    #[must_use]
    pub fn max_context_tokens(&self) -> usize {
        self.max_context_tokens.unwrap_or(DEFAULT_MAX_CONTEXT_TOKENS)
    }

    #[must_use]
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES)
    }

    #[must_use]
    pub fn selection_cap(&self) -> usize {
        self.selection_cap.unwrap_or(DEFAULT_SELECTION_CAP)
    }

    #[must_use]
    pub fn share_floor_tokens(&self) -> usize {
        self.share_floor_tokens.unwrap_or(DEFAULT_SHARE_FLOOR_TOKENS)
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Provider name: `openai` (default) or `anthropic`.
    pub provider: Option<String>,
    /// Timeout for a single LLM call, in seconds.
    pub timeout_secs: Option<u64>,
    pub openai: Option<OpenAiConfig>,
    pub anthropic: Option<AnthropicConfig>,
}

impl LlmConfig {
    #[must_use]
    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or("openai")
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
    }
}

/// OpenAI chat-completions provider settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Anthropic messages-API provider settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnthropicConfig {
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen: Option<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::default();
        assert_eq!(config.limits.max_context_tokens(), DEFAULT_MAX_CONTEXT_TOKENS);
        assert_eq!(config.limits.max_file_bytes(), DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.limits.selection_cap(), DEFAULT_SELECTION_CAP);
        assert_eq!(config.limits.share_floor_tokens(), DEFAULT_SHARE_FLOOR_TOKENS);
        assert_eq!(config.llm.provider(), "openai");
        assert_eq!(config.llm.timeout_secs(), DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.server.listen(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [limits]
            max_context_tokens = 50000
            selection_cap = 10

            [llm]
            provider = "anthropic"
            timeout_secs = 30

            [llm.anthropic]
            model = "claude-sonnet-4-5"
            api_key_env = "MY_KEY"

            [server]
            listen = "127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.limits.max_context_tokens(), 50_000);
        assert_eq!(config.limits.selection_cap(), 10);
        // Unset values still fall back
        assert_eq!(config.limits.max_file_bytes(), DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.llm.provider(), "anthropic");
        assert_eq!(config.llm.timeout_secs(), 30);
        let anthropic = config.llm.anthropic.as_ref().unwrap();
        assert_eq!(anthropic.model.as_deref(), Some("claude-sonnet-4-5"));
        assert_eq!(anthropic.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(config.server.listen(), "127.0.0.1:9000");
    }

    #[test]
    fn malformed_toml_is_invalid_file() {
        let err = Config::from_toml_str("limits = 7").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    #[test]
    fn explicit_missing_path_is_not_found() {
        let err = Config::from_file(Path::new("/nonexistent/reposcribe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reposcribe.toml");
        fs::write(&path, "[limits]\nmax_context_tokens = 1234\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.limits.max_context_tokens(), 1234);
    }
}
