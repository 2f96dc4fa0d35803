//! Thin HTTP layer over the pipeline.
//!
//! Two routes: `POST /summarize` and `GET /health`. No logic beyond request
//! decode, one call into [`Pipeline::process_repo`], response encode.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use reposcribe_utils::error::ReposcribeError;

use crate::pipeline::Pipeline;

/// Request body for `POST /summarize`.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// GitHub repository URL.
    pub url: String,
    /// Priority mode; defaults to `all`.
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Request-level API key; falls back to the configured environment
    /// variable when absent.
    pub api_key: Option<String>,
}

fn default_priority() -> String {
    "all".to_string()
}

/// Response body for `POST /summarize`.
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub summary: String,
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the router with all routes.
pub fn router(pipeline: Arc<Pipeline>) -> axum::Router {
    axum::Router::new()
        .route("/summarize", post(handle_summarize))
        .route("/health", get(handle_health))
        .with_state(pipeline)
}

/// Serve until the process is terminated.
///
/// # Errors
///
/// Returns the bind or accept-loop error.
pub async fn serve(listen: &str, pipeline: Arc<Pipeline>) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listen, "HTTP server listening");
    axum::serve(listener, router(pipeline)).await
}

async fn handle_summarize(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let summary = pipeline
        .process_repo(&request.url, &request.priority, request.api_key.as_deref())
        .await
        .map_err(|e| {
            (
                status_for(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    Ok(Json(SummarizeResponse {
        url: request.url,
        summary,
    }))
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn status_for(error: &ReposcribeError) -> StatusCode {
    match error {
        ReposcribeError::Input(_) | ReposcribeError::Config(_) => StatusCode::BAD_REQUEST,
        ReposcribeError::Clone(_) | ReposcribeError::Llm(_) => StatusCode::BAD_GATEWAY,
        ReposcribeError::BudgetOverrun { .. }
        | ReposcribeError::Tokenizer(_)
        | ReposcribeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use reposcribe_config::Config;
    use reposcribe_utils::error::{CloneError, InputError, LlmError};
    use tower::util::ServiceExt;

    fn test_router() -> axum::Router {
        let pipeline = Arc::new(Pipeline::new(Config::default()).unwrap());
        router(pipeline)
    }

    #[test]
    fn status_mapping_follows_error_taxonomy() {
        let input = ReposcribeError::Input(InputError::NotGitHub {
            url: "x".to_string(),
        });
        assert_eq!(status_for(&input), StatusCode::BAD_REQUEST);

        let clone = ReposcribeError::Clone(CloneError::GitNotFound);
        assert_eq!(status_for(&clone), StatusCode::BAD_GATEWAY);

        let llm = ReposcribeError::Llm(LlmError::Transport("x".to_string()));
        assert_eq!(status_for(&llm), StatusCode::BAD_GATEWAY);

        let overrun = ReposcribeError::BudgetOverrun { used: 2, budget: 1 };
        assert_eq!(status_for(&overrun), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let resp = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "ok");
    }

    #[tokio::test]
    async fn invalid_url_is_bad_request() {
        let resp = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"url": "https://gitlab.com/group/project", "api_key": "sk-test"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            error["error"]
                .as_str()
                .unwrap()
                .contains("not a GitHub URL")
        );
    }

    #[tokio::test]
    async fn invalid_priority_is_bad_request() {
        let resp = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"url": "https://github.com/a/b", "priority": "urgent", "api_key": "sk-test"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
