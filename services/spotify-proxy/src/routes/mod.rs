//! HTTP handlers
//!
//! - `auth`: `/login` and `/callback`
//! - `player`: the `/spotify/*` data routes

pub mod auth;
pub mod player;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ApiError;

/// `GET /` greeting.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello from spotify-proxy" }))
}

/// `GET /health`: liveness plus whether `/callback` has completed.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let authenticated = state.tokens.is_authenticated().await?;
    Ok(Json(json!({
        "status": "healthy",
        "authenticated": authenticated,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    })))
}

/// `GET /metrics` in Prometheus text exposition format.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.prometheus.render(),
    )
}
