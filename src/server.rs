//! HTTP proxy between the UI and the configured LLM backend.
//!
//! Routes:
//!   POST /api/chat             - `ChatRequest` -> `ChatResponse`
//!   POST /api/market-research  - `MarketResearchRequest` -> `MarketReport`
//!   GET  /health               - liveness check
//!
//! Every failure is answered with an `ErrorResponse`: 400 for malformed
//! input, 500 when the backend fails.

use crate::ai::{
    ChatBackend, ChatError, ChatRequest, ChatResponse, ErrorResponse, MarketReport,
    MarketResearchRequest, backend_from_config, complete_chat, research_market,
};
use crate::config::Config;
use crate::content::{
    ERROR_CHAT_FAILED, ERROR_INVALID_MESSAGES, ERROR_QUERY_REQUIRED, ERROR_RESEARCH_FAILED,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json as ExtractJson, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
struct AppState {
    backend: Arc<dyn ChatBackend>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Error body plus the status it is sent with.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Validation errors keep their message; anything else is logged and
    /// replaced with `fallback`.
    fn from_chat(err: ChatError, fallback: &str) -> Self {
        match err {
            ChatError::Validation(message) => Self::bad_request(message),
            other => {
                tracing::error!("backend call failed: {other}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: fallback.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Build the API router around a backend.
pub fn router(backend: Arc<dyn ChatBackend>) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/market-research", post(handle_market_research))
        .route("/health", get(handle_health))
        .with_state(AppState { backend })
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on(
    listener: TcpListener,
    backend: Arc<dyn ChatBackend>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(backend))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `config.bind_addr` and serve until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let backend = backend_from_config(config);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);

    serve_on(listener, backend, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {e}"),
        }
    })
    .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<ExtractJson<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let ExtractJson(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected chat body: {rejection}");
        ApiError::bad_request(ERROR_INVALID_MESSAGES)
    })?;

    tracing::info!(
        messages = request.messages.len(),
        market_research = request.market_research,
        "chat request"
    );
    let response = complete_chat(state.backend.as_ref(), request.messages, request.market_research)
        .await
        .map_err(|err| ApiError::from_chat(err, ERROR_CHAT_FAILED))?;
    Ok(Json(ChatResponse { response }))
}

async fn handle_market_research(
    State(state): State<AppState>,
    payload: Result<ExtractJson<MarketResearchRequest>, JsonRejection>,
) -> Result<Json<MarketReport>, ApiError> {
    let ExtractJson(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected market research body: {rejection}");
        ApiError::bad_request(ERROR_QUERY_REQUIRED)
    })?;

    let query = request.query.unwrap_or_default();
    tracing::info!(query = %query, "market research request");
    let report = research_market(state.backend.as_ref(), &query)
        .await
        .map_err(|err| ApiError::from_chat(err, ERROR_RESEARCH_FAILED))?;
    Ok(Json(report))
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
