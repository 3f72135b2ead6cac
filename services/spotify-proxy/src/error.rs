//! Per-request errors and their HTTP rendering
//!
//! Every failure is returned as `{"detail": "...", "request_id": "req_..."}`.
//! Token endpoint failures show a fixed detail; the underlying cause is only
//! logged, keyed by the request id.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated: visit /login to authorize this proxy")]
    NotAuthenticated,

    #[error("Token refresh failed")]
    TokenRefresh(String),

    #[error("Token exchange failed")]
    TokenExchange(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Missing authorization code")]
    MissingCode,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Spotify request failed: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::TokenRefresh(_) | ApiError::TokenExchange(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::AuthorizationDenied(_)
            | ApiError::MissingCode
            | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<spotify_auth::Error> for ApiError {
    fn from(e: spotify_auth::Error) -> Self {
        match e {
            spotify_auth::Error::NotAuthenticated => ApiError::NotAuthenticated,
            spotify_auth::Error::TokenExchange(cause) => ApiError::TokenExchange(cause),
            spotify_auth::Error::TokenRefresh(cause) => ApiError::TokenRefresh(cause),
            other @ (spotify_auth::Error::InvalidUrl(_) | spotify_auth::Error::Session(_)) => {
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<spotify_api::Error> for ApiError {
    fn from(e: spotify_api::Error) -> Self {
        ApiError::Upstream {
            operation: e.operation(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = format!("req_{}", uuid::Uuid::new_v4().as_simple());
        let status = self.status();

        match &self {
            ApiError::TokenRefresh(cause) => {
                metrics::record_upstream_error("token_refresh");
                error!(request_id = %request_id, error = %cause, "token refresh failed");
            }
            ApiError::TokenExchange(cause) => {
                metrics::record_upstream_error("token_exchange");
                error!(request_id = %request_id, error = %cause, "token exchange failed");
            }
            ApiError::Upstream { operation, message } => {
                metrics::record_upstream_error(operation);
                error!(
                    request_id = %request_id,
                    operation,
                    error = %message,
                    "spotify request failed"
                );
            }
            ApiError::Internal(message) => {
                error!(request_id = %request_id, error = %message, "internal error");
            }
            other => {
                warn!(
                    request_id = %request_id,
                    status = status.as_u16(),
                    error = %other,
                    "request rejected"
                );
            }
        }

        let body = serde_json::json!({
            "detail": self.to_string(),
            "request_id": request_id,
        });
        (status, Json(body)).into_response()
    }
}
