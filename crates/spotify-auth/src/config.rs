//! Client credentials and accounts-service endpoints

use common::Secret;
use reqwest::Url;

use crate::constants::{ACCOUNTS_BASE_URL, AUTHORIZE_PATH, SCOPES, TOKEN_PATH};
use crate::error::{Error, Result};

/// Registered Spotify application plus the endpoints it talks to.
///
/// Immutable for the process lifetime. Endpoints default to the public
/// accounts service; tests and self-hosted mocks point them elsewhere with
/// [`OAuthConfig::with_accounts_url`].
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            authorize_url: format!("{ACCOUNTS_BASE_URL}{AUTHORIZE_PATH}"),
            token_url: format!("{ACCOUNTS_BASE_URL}{TOKEN_PATH}"),
        }
    }

    /// Point both endpoints at another accounts service base URL.
    pub fn with_accounts_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.authorize_url = format!("{base}{AUTHORIZE_PATH}");
        self.token_url = format!("{base}{TOKEN_PATH}");
        self
    }

    /// Consent screen URL the browser is redirected to by `/login`.
    ///
    /// Query values are form-encoded, so the space separated scope list is
    /// sent as `+` separated.
    pub fn authorization_url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", SCOPES),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.authorize_url)))?;
        Ok(url.into())
    }
}
