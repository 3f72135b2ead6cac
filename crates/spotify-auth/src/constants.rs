//! Spotify accounts service endpoints and the scopes the proxy requests

/// Base URL of the Spotify accounts service
pub const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Consent screen path, relative to the accounts base URL
pub const AUTHORIZE_PATH: &str = "/authorize";

/// Token endpoint path for both code exchange and refresh
pub const TOKEN_PATH: &str = "/api/token";

/// Scopes covering playback state, playback control and top tracks.
pub const SCOPES: &str = "user-read-playback-state user-modify-playback-state user-read-currently-playing user-top-read";
