//! Error types for the OAuth flow

/// Errors from the Spotify OAuth flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No refresh token has been stored yet; the user must go through `/login`.
    #[error("not authenticated: no refresh token stored")]
    NotAuthenticated,

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("invalid authorize URL: {0}")]
    InvalidUrl(String),

    /// Raised by [`SessionStore`](crate::SessionStore) backends that can
    /// fail. The in-memory store never does.
    #[error("session store error: {0}")]
    Session(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
