//! Spotify Web API resources used by the proxy
//!
//! [`WebApi`] issues the four Bearer-authorized calls (top tracks,
//! currently playing, play, pause). [`models`] holds both the upstream
//! payloads and the reshaped summaries the proxy returns to its clients.

pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{DEFAULT_API_URL, WebApi};
pub use models::{NowPlaying, TrackSummary, join_artists};

/// Errors from Web API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("{operation} request failed: {message}")]
    Http {
        operation: &'static str,
        message: String,
    },

    /// Spotify answered with a status the operation does not accept.
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("{operation} response could not be decoded: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}

impl Error {
    /// Which Web API call failed, for logging and metric labels.
    pub fn operation(&self) -> &'static str {
        match self {
            Error::Http { operation, .. }
            | Error::Status { operation, .. }
            | Error::Decode { operation, .. } => operation,
        }
    }
}

/// Result alias for Web API operations.
pub type Result<T> = std::result::Result<T, Error>;
