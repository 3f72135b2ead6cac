//! In-process Spotify stand-in for router tests
//!
//! Serves both the accounts token endpoint and the Web API player routes
//! from one listener. Accepts the authorization code `good-code`, any
//! refresh token starting with `rt_`, and the access token `at_fresh`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub(crate) struct MockSpotify {
    pub nothing_playing: AtomicBool,
    pub player_status: AtomicU16,
    pub top_track_count: AtomicUsize,
    pub token_calls: AtomicUsize,
    pub api_calls: AtomicUsize,
    play_bodies: Mutex<Vec<Value>>,
}

impl Default for MockSpotify {
    fn default() -> Self {
        Self {
            nothing_playing: AtomicBool::new(false),
            player_status: AtomicU16::new(204),
            top_track_count: AtomicUsize::new(12),
            token_calls: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            play_bodies: Mutex::new(Vec::new()),
        }
    }
}

impl MockSpotify {
    pub fn play_bodies(&self) -> Vec<Value> {
        self.play_bodies.lock().unwrap().clone()
    }

    pub fn outbound_calls(&self) -> usize {
        self.token_calls.load(Ordering::Relaxed) + self.api_calls.load(Ordering::Relaxed)
    }

    /// Count an API call and check its bearer token.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
        if bearer == Some("Bearer at_fresh") {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
            )
                .into_response())
        }
    }

    fn player_status(&self) -> StatusCode {
        StatusCode::from_u16(self.player_status.load(Ordering::Relaxed))
            .unwrap_or(StatusCode::NO_CONTENT)
    }
}

async fn token(
    State(mock): State<Arc<MockSpotify>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.token_calls.fetch_add(1, Ordering::Relaxed);
    let field = |key: &str| form.get(key).map(String::as_str).unwrap_or_default();

    match field("grant_type") {
        "authorization_code" if field("code") == "good-code" => Json(json!({
            "access_token": "at_from_callback",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "rt_from_callback",
        }))
        .into_response(),
        "refresh_token" if field("refresh_token").starts_with("rt_") => Json(json!({
            "access_token": "at_fresh",
            "token_type": "Bearer",
            "expires_in": 3600,
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response(),
    }
}

async fn top_tracks(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authorize(&headers) {
        return rejection;
    }
    let items: Vec<Value> = (0..mock.top_track_count.load(Ordering::Relaxed))
        .map(|i| {
            let artists = if i == 0 {
                json!([{"name": "A"}, {"name": "B"}])
            } else {
                json!([{"name": format!("Artist {i}")}])
            };
            json!({
                "name": format!("Track {i}"),
                "uri": format!("spotify:track:{i}"),
                "artists": artists,
            })
        })
        .collect();
    Json(json!({ "items": items })).into_response()
}

async fn currently_playing(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authorize(&headers) {
        return rejection;
    }
    if mock.nothing_playing.load(Ordering::Relaxed) {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({
        "is_playing": false,
        "item": {
            "name": "Paused Song",
            "uri": "spotify:track:77",
            "artists": [{"name": "X"}, {"name": "Y"}],
        },
    }))
    .into_response()
}

async fn play(
    State(mock): State<Arc<MockSpotify>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = mock.authorize(&headers) {
        return rejection;
    }
    mock.play_bodies.lock().unwrap().push(body);
    mock.player_status().into_response()
}

async fn pause(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authorize(&headers) {
        return rejection;
    }
    mock.player_status().into_response()
}

/// Serve the mock on an ephemeral port and return its base URL. The Web
/// API lives under `{base}/v1`.
pub(crate) async fn start(mock: Arc<MockSpotify>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .route("/v1/me/player/play", put(play))
        .route("/v1/me/player/pause", put(pause))
        .with_state(mock);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
