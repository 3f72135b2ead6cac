//! In-process stand-in for the Spotify token endpoint

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use common::Secret;
use tokio::net::TcpListener;

use crate::config::OAuthConfig;

/// Accepts the code `good-code` and any refresh token starting with `rt_`.
/// Every received form is recorded.
#[derive(Default)]
pub(crate) struct MockTokenEndpoint {
    requests: Mutex<Vec<HashMap<String, String>>>,
    pub rotate: AtomicBool,
}

impl MockTokenEndpoint {
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }
}

async fn token(
    State(mock): State<Arc<MockTokenEndpoint>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.requests.lock().unwrap().push(form.clone());

    let grant = form.get("grant_type").map(String::as_str);
    match grant {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => {
            Json(serde_json::json!({
                "access_token": "at_initial",
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
                "refresh_token": "rt_initial",
            }))
            .into_response()
        }
        Some("refresh_token")
            if form
                .get("refresh_token")
                .is_some_and(|t| t.starts_with("rt_")) =>
        {
            let mut body = serde_json::json!({
                "access_token": "at_refreshed",
                "token_type": "Bearer",
                "expires_in": 3600,
            });
            if mock.rotate.load(Ordering::Relaxed) {
                body["refresh_token"] = "rt_rotated".into();
            }
            Json(body).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        )
            .into_response(),
    }
}

/// Serve the mock on an ephemeral port and return its base URL.
pub(crate) async fn start(mock: Arc<MockTokenEndpoint>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/token", post(token))
        .with_state(mock);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client config whose endpoints point at a freshly started mock.
pub(crate) async fn mock_oauth(mock: &Arc<MockTokenEndpoint>) -> OAuthConfig {
    let base = start(mock.clone()).await;
    OAuthConfig::new(
        "client-abc",
        Secret::new("client-secret".to_string()),
        "http://localhost:8000/callback",
    )
    .with_accounts_url(&base)
}
