//! Spotify OAuth authorization-code flow
//!
//! Builds the consent URL, exchanges authorization codes, refreshes access
//! tokens and keeps the single refresh token for the process. The proxy
//! binary only talks to [`TokenManager`]; the free functions in [`token`]
//! are the raw token endpoint calls.
//!
//! Credential flow:
//! 1. `/login` redirects to `OAuthConfig::authorization_url()`
//! 2. Spotify redirects back to `/callback?code=...`
//! 3. `TokenManager::complete_authorization()` exchanges the code and
//!    stores the refresh token in the `SessionStore`
//! 4. Every data route calls `TokenManager::access_token()`, which mints a
//!    fresh access token from the stored refresh token

pub mod config;
pub mod constants;
pub mod error;
pub mod manager;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::OAuthConfig;
pub use constants::*;
pub use error::{Error, Result};
pub use manager::TokenManager;
pub use session::{MemorySessionStore, SessionStore};
pub use token::{AccessToken, TokenResponse, exchange_code, refresh_access_token};
