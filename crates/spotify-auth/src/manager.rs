//! Token Manager: the only entry point routes use for credentials

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::OAuthConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::token::{self, TokenResponse};

/// Glues the token endpoint calls to the session store.
///
/// Access tokens are never cached: every [`TokenManager::access_token`]
/// call performs one refresh grant.
pub struct TokenManager {
    http: reqwest::Client,
    oauth: OAuthConfig,
    store: Arc<dyn SessionStore>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, oauth: OAuthConfig, store: Arc<dyn SessionStore>) -> Self {
        Self { http, oauth, store }
    }

    pub fn authorization_url(&self) -> Result<String> {
        self.oauth.authorization_url()
    }

    /// Whether a refresh token has been stored.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get().await?.is_some())
    }

    /// Exchange an authorization code and store the returned refresh token.
    ///
    /// The store is only written after a successful exchange.
    #[instrument(skip_all)]
    pub async fn complete_authorization(&self, code: &str) -> Result<TokenResponse> {
        let tokens = token::exchange_code(&self.http, &self.oauth, code).await?;
        self.store.set(tokens.refresh_token.clone()).await?;
        info!("authorization completed, refresh token stored");
        Ok(tokens)
    }

    /// Mint a fresh access token from the stored refresh token.
    ///
    /// Fails with [`Error::NotAuthenticated`] before any outbound call when
    /// no refresh token is stored.
    #[instrument(skip_all)]
    pub async fn access_token(&self) -> Result<String> {
        let refresh = self.store.get().await?.ok_or(Error::NotAuthenticated)?;
        let refreshed = token::refresh_access_token(&self.http, &self.oauth, &refresh).await?;

        if let Some(rotated) = refreshed.refresh_token.filter(|r| *r != refresh) {
            if let Err(e) = self.store.set(rotated).await {
                warn!(error = %e, "failed to store rotated refresh token");
            } else {
                info!("refresh token rotated");
            }
        }

        Ok(refreshed.access_token)
    }
}
