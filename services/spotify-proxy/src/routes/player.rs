//! `/spotify/*` routes: mint an access token, make one Web API call, reshape

use axum::Json;
use axum::extract::{Request, State};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use spotify_api::{NowPlaying, TrackSummary};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;
use crate::metrics;

/// Fixed page size for top tracks; there is no pagination.
pub const TOP_TRACKS_LIMIT: u32 = 10;

/// The play body only carries one uri.
const MAX_PLAY_BODY_BYTES: usize = 64 * 1024;

/// `GET /spotify/top-tracks`
pub async fn top_tracks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrackSummary>>, ApiError> {
    let token = state.tokens.access_token().await?;
    let tracks = state.api.top_tracks(&token, TOP_TRACKS_LIMIT).await?;

    Ok(Json(
        tracks
            .iter()
            .take(TOP_TRACKS_LIMIT as usize)
            .map(TrackSummary::from)
            .collect(),
    ))
}

/// `GET /spotify/now-playing`
pub async fn now_playing(State(state): State<AppState>) -> Result<Json<NowPlaying>, ApiError> {
    let token = state.tokens.access_token().await?;
    let playback = state.api.currently_playing(&token).await?;
    Ok(Json(NowPlaying::from_playback(playback)))
}

#[derive(Debug, Deserialize)]
pub struct PlayBody {
    #[serde(default)]
    pub uri: Option<String>,
}

/// `POST /spotify/play` with `{"uri": "..."}`. The uri is forwarded as is.
///
/// The body is parsed as JSON whatever its Content-Type, and only after the
/// session check, so an unauthenticated call is always a 401.
pub async fn play(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let token = state.tokens.access_token().await?;

    let bytes = axum::body::to_bytes(request.into_body(), MAX_PLAY_BODY_BYTES)
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("unreadable body: {e}")))?;
    let body: PlayBody = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::InvalidRequest(format!("body must be a JSON object: {e}")))?;

    let uri = body.uri.as_deref();
    let status = state.api.play(&token, uri).await?;
    check_playback(&state, "play", status)?;

    Ok(Json(json!({
        "status": format!("Playing {}", uri.unwrap_or("null")),
    })))
}

/// `POST /spotify/pause`
pub async fn pause(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let token = state.tokens.access_token().await?;
    let status = state.api.pause(&token).await?;
    check_playback(&state, "pause", status)?;

    Ok(Json(json!({ "status": "Paused" })))
}

/// Playback commands report success even when Spotify rejects them (no
/// active device, non-premium account) unless `strict_playback` is set.
fn check_playback(
    state: &AppState,
    operation: &'static str,
    status: StatusCode,
) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    if state.strict_playback {
        return Err(ApiError::Upstream {
            operation,
            message: format!("{operation} returned {status}"),
        });
    }
    metrics::record_upstream_error(operation);
    warn!(
        operation,
        status = status.as_u16(),
        "spotify rejected playback command, reporting success"
    );
    Ok(())
}
