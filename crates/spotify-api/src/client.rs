//! Bearer-authorized Web API calls
//!
//! Each method is exactly one outbound request. Transport failures and
//! unexpected statuses become [`Error`]; play and pause hand the upstream
//! status back so the caller decides whether a rejection matters.

use reqwest::StatusCode;
use reqwest::header::CONTENT_LENGTH;
use tracing::{debug, instrument};

use crate::models::{CurrentlyPlaying, Paging, PlayRequest, Track};
use crate::{Error, Result};

/// Public Web API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Thin client over the player and personalization endpoints.
#[derive(Debug, Clone)]
pub struct WebApi {
    http: reqwest::Client,
    base_url: String,
}

impl WebApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /me/top/tracks?limit=<limit>`, in Spotify's order.
    #[instrument(skip_all, fields(limit = limit))]
    pub async fn top_tracks(&self, access_token: &str, limit: u32) -> Result<Vec<Track>> {
        const OP: &str = "top_tracks";
        let response = self
            .http
            .get(self.url("/me/top/tracks"))
            .bearer_auth(access_token)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| http_error(OP, e))?;

        let response = expect_status(OP, response, |s| s == StatusCode::OK).await?;
        let page: Paging<Track> = response.json().await.map_err(|e| decode_error(OP, e))?;
        debug!(items = page.items.len(), "fetched top tracks");
        Ok(page.items)
    }

    /// `GET /me/player/currently-playing`. `None` when Spotify answers 204.
    #[instrument(skip_all)]
    pub async fn currently_playing(&self, access_token: &str) -> Result<Option<CurrentlyPlaying>> {
        const OP: &str = "currently_playing";
        let response = self
            .http
            .get(self.url("/me/player/currently-playing"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| http_error(OP, e))?;

        if response.status() == StatusCode::NO_CONTENT {
            debug!("nothing playing");
            return Ok(None);
        }

        let response = expect_status(OP, response, |s| s == StatusCode::OK).await?;
        response
            .json::<CurrentlyPlaying>()
            .await
            .map(Some)
            .map_err(|e| decode_error(OP, e))
    }

    /// `PUT /me/player/play` with `{"uris": [uri]}`. Returns the upstream status.
    #[instrument(skip_all, fields(uri = uri.unwrap_or("null")))]
    pub async fn play(&self, access_token: &str, uri: Option<&str>) -> Result<StatusCode> {
        let response = self
            .http
            .put(self.url("/me/player/play"))
            .bearer_auth(access_token)
            .json(&PlayRequest { uris: vec![uri] })
            .send()
            .await
            .map_err(|e| http_error("play", e))?;
        Ok(response.status())
    }

    /// `PUT /me/player/pause` with an empty body. Returns the upstream status.
    #[instrument(skip_all)]
    pub async fn pause(&self, access_token: &str) -> Result<StatusCode> {
        let response = self
            .http
            .put(self.url("/me/player/pause"))
            .bearer_auth(access_token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(|e| http_error("pause", e))?;
        Ok(response.status())
    }
}

fn http_error(operation: &'static str, e: reqwest::Error) -> Error {
    Error::Http {
        operation,
        message: e.to_string(),
    }
}

fn decode_error(operation: &'static str, e: reqwest::Error) -> Error {
    Error::Decode {
        operation,
        message: e.to_string(),
    }
}

async fn expect_status(
    operation: &'static str,
    response: reqwest::Response,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<reqwest::Response> {
    let status = response.status();
    if accept(status) {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"));
    Err(Error::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}
