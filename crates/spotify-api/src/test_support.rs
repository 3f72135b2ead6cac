//! In-process stand-in for the Web API player endpoints

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Only the token `at_valid` is accepted by the read endpoints.
pub(crate) struct MockWebApi {
    pub nothing_playing: AtomicBool,
    pub player_status: AtomicU16,
    pub pause_calls: AtomicUsize,
    limits: Mutex<Vec<u32>>,
    play_bodies: Mutex<Vec<Value>>,
}

impl Default for MockWebApi {
    fn default() -> Self {
        Self {
            nothing_playing: AtomicBool::new(false),
            player_status: AtomicU16::new(204),
            pause_calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
            play_bodies: Mutex::new(Vec::new()),
        }
    }
}

impl MockWebApi {
    pub fn last_limit(&self) -> Option<u32> {
        self.limits.lock().unwrap().last().copied()
    }

    pub fn play_bodies(&self) -> Vec<Value> {
        self.play_bodies.lock().unwrap().clone()
    }

    fn player_status(&self) -> StatusCode {
        StatusCode::from_u16(self.player_status.load(Ordering::Relaxed))
            .unwrap_or(StatusCode::NO_CONTENT)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer at_valid")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
    )
        .into_response()
}

async fn top_tracks(
    State(mock): State<Arc<MockWebApi>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(limit) = query.get("limit").and_then(|l| l.parse().ok()) {
        mock.limits.lock().unwrap().push(limit);
    }
    Json(json!({
        "items": [
            {"name": "First", "uri": "spotify:track:1", "artists": [{"name": "A"}, {"name": "B"}]},
            {"name": "Second", "uri": "spotify:track:2", "artists": [{"name": "C"}]},
            {"name": "Third", "uri": "spotify:track:3", "artists": []},
        ],
        "limit": 10,
        "total": 3,
    }))
    .into_response()
}

async fn currently_playing(State(mock): State<Arc<MockWebApi>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if mock.nothing_playing.load(Ordering::Relaxed) {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({
        "is_playing": true,
        "progress_ms": 1234,
        "item": {"name": "Now", "uri": "spotify:track:9", "artists": [{"name": "Band"}]},
    }))
    .into_response()
}

async fn play(State(mock): State<Arc<MockWebApi>>, Json(body): Json<Value>) -> StatusCode {
    mock.play_bodies.lock().unwrap().push(body);
    mock.player_status()
}

async fn pause(State(mock): State<Arc<MockWebApi>>) -> StatusCode {
    mock.pause_calls.fetch_add(1, Ordering::Relaxed);
    mock.player_status()
}

/// Serve the mock on an ephemeral port and return its `/v1` base URL.
pub(crate) async fn start(mock: Arc<MockWebApi>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .route("/v1/me/player/play", put(play))
        .route("/v1/me/player/pause", put(pause))
        .with_state(mock);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}
