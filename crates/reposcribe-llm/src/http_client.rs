//! Shared HTTP client for provider backends.
//!
//! One `reqwest::Client` per backend, TLS via rustls, per-request timeout.
//! There is deliberately no retry loop: a failed ranking call falls back to
//! deterministic selection, a failed summarization call is terminal.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use reposcribe_utils::error::LlmError;

/// Connect timeout applied to every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a configured `reqwest::Client`.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] if the client cannot be
    /// constructed.
    pub fn new() -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .use_rustls_tls()
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Execute a request once, mapping failures onto the error taxonomy.
    ///
    /// # Errors
    ///
    /// - [`LlmError::ProviderAuth`] for 401/403
    /// - [`LlmError::ProviderQuota`] for 429
    /// - [`LlmError::ProviderOutage`] for 5xx
    /// - [`LlmError::Timeout`] when the deadline passes
    /// - [`LlmError::Transport`] for other network or protocol failures
    pub async fn execute(
        &self,
        request_builder: reqwest::RequestBuilder,
        timeout: Duration,
        provider: &str,
    ) -> Result<Response, LlmError> {
        let request = request_builder
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build request: {e}")))?;

        debug!(
            provider = provider,
            timeout_secs = timeout.as_secs(),
            "executing HTTP request"
        );

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    seconds: timeout.as_secs(),
                }
            } else {
                LlmError::Transport(format!("{provider} request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(map_error_status(status, provider))
    }
}

fn map_error_status(status: StatusCode, provider: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::ProviderAuth(format!("{provider} returned {status}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            LlmError::ProviderQuota(format!("{provider} returned {status}"))
        }
        s if s.is_server_error() => {
            LlmError::ProviderOutage(format!("{provider} returned server error: {s}"))
        }
        s => LlmError::Transport(format!("{provider} returned unexpected status: {s}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert!(matches!(
            map_error_status(StatusCode::UNAUTHORIZED, "test"),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::FORBIDDEN, "test"),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::TOO_MANY_REQUESTS, "test"),
            LlmError::ProviderQuota(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::BAD_GATEWAY, "test"),
            LlmError::ProviderOutage(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::BAD_REQUEST, "test"),
            LlmError::Transport(_)
        ));
    }
}
