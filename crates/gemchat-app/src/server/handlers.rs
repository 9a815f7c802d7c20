//! HTTP request handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use gemchat_ai::ExchangeContext;
use gemchat_common::ExchangeId;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};

use super::error::AppError;
use super::types::{ChatRequest, ChatResponse, HealthResponse};
use super::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Create the router with `state` injected.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.session.model().to_string(),
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let id = ExchangeId::new();
    let ctx = ExchangeContext::new()
        .with_cancel(state.shutdown.child_token())
        .with_timeout(state.exchange_timeout);

    async move {
        match state.session.exchange(&ctx, &request.message).await {
            Ok(response) => {
                info!(reply_len = response.len(), "chat exchange completed");
                Ok(Json(ChatResponse { response }))
            }
            Err(e) => {
                warn!(error = %e, "chat exchange failed");
                Err(AppError::from(e))
            }
        }
    }
    .instrument(info_span!("chat", exchange_id = %id))
    .await
}
