//! Authorization-code flow routes

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// `GET /login`: 302 to the Spotify consent screen.
pub async fn login(State(state): State<AppState>) -> Result<Response, ApiError> {
    let url = state.tokens.authorization_url()?;
    info!("redirecting to spotify consent screen");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// Query Spotify appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set instead of `code` when the user declines consent
    pub error: Option<String>,
}

/// `GET /callback`: exchange the code and keep the refresh token.
///
/// The stored token is only replaced once the exchange succeeded.
pub async fn callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    if let Some(reason) = params.error {
        return Err(ApiError::AuthorizationDenied(reason));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCode)?;

    let tokens = state.tokens.complete_authorization(&code).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "refresh_token": tokens.refresh_token,
    })))
}
