//! Token endpoint calls
//!
//! Both operations POST a form to `OAuthConfig::token_url` with the client
//! credentials in the body:
//! 1. Authorization code exchange (`/callback`)
//! 2. Refresh token grant (every data route)
//!
//! Only a 200 counts as success. Anything else, including transport and
//! decoding failures, is reported as the matching exchange/refresh error.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OAuthConfig;
use crate::error::{Error, Result};

/// Token endpoint response to an authorization code exchange.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Token endpoint response to a refresh grant.
///
/// Spotify may rotate the refresh token; when it does the new value is in
/// `refresh_token` and must replace the stored one.
#[derive(Debug, Deserialize, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchange an authorization code for access and refresh tokens.
pub async fn exchange_code(
    client: &reqwest::Client,
    oauth: &OAuthConfig,
    code: &str,
) -> Result<TokenResponse> {
    let response = client
        .post(&oauth.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", oauth.redirect_uri.as_str()),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.expose().as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::TokenExchange(format!("request failed: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    debug!("authorization code exchanged");
    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
}

/// Mint a new access token from a refresh token.
///
/// One outbound call per invocation; nothing is cached.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    oauth: &OAuthConfig,
    refresh_token: &str,
) -> Result<AccessToken> {
    let response = client
        .post(&oauth.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.expose().as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::TokenRefresh(format!("request failed: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenRefresh(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<AccessToken>()
        .await
        .map_err(|e| Error::TokenRefresh(format!("invalid refresh response: {e}")))
}
