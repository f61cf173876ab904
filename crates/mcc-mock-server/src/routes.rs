//! HTTP routes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::corpus::SnippetPicker;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub picker: Arc<SnippetPicker>,
    pub response_delay: Duration,
}

impl AppState {
    /// Create state with the given picker and delay.
    pub fn new(picker: SnippetPicker, response_delay: Duration) -> Self {
        Self {
            picker: Arc::new(picker),
            response_delay,
        }
    }
}

/// `POST /generate` body.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// `POST /generate` response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub code: String,
    pub language: String,
    pub prompt: String,
}

/// `GET /health` response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Build the router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn generate(State(state): State<AppState>, Json(body): Json<GenerateBody>) -> Response {
    let prompt = match body.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Prompt is required".to_string(),
                }),
            )
                .into_response();
        }
    };

    info!(
        language = body.language.as_deref().unwrap_or("auto"),
        "Generating code"
    );

    let snippet = state.picker.pick();

    if !state.response_delay.is_zero() {
        tokio::time::sleep(state.response_delay).await;
    }

    Json(GenerateResponse {
        code: snippet.code.to_string(),
        language: snippet.language.to_string(),
        prompt,
    })
    .into_response()
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Mock API is running".to_string(),
    })
}
