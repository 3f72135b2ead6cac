//! Configuration types and loading
//!
//! The file path is resolved as `--config`, then `CONFIG_PATH`, then
//! `spotify-proxy.toml` when present. The file is optional. Settings come
//! from the file over built-in defaults, and the `SPOTIFY_*` credential
//! variables are then overlaid on top, so a bare environment is enough to
//! run.
//!
//! The client secret comes from `SPOTIFY_CLIENT_SECRET` or
//! `client_secret_file`, never from the TOML directly.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use common::Secret;
use serde::Deserialize;
use spotify_auth::OAuthConfig;

pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";

const DEFAULT_CONFIG_FILE: &str = "spotify-proxy.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub spotify: SpotifyConfig,
}

/// Listener and outbound client settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Applied to every outbound request
    pub timeout_secs: u64,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            timeout_secs: 30,
            max_connections: 1000,
        }
    }
}

/// Spotify application and endpoint settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub accounts_url: String,
    pub api_url: String,
    /// Turn rejected play/pause calls into 502s instead of reporting success
    pub strict_playback: bool,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    pub client_secret_file: Option<PathBuf>,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            accounts_url: spotify_auth::ACCOUNTS_BASE_URL.to_string(),
            api_url: spotify_api::DEFAULT_API_URL.to_string(),
            strict_playback: false,
            client_id: None,
            redirect_uri: None,
            client_secret: None,
            client_secret_file: None,
        }
    }
}

impl Config {
    /// Load the TOML file (if any), overlay the process environment and
    /// validate.
    pub fn load(path: Option<&Path>) -> common::Result<Self> {
        let mut config = match path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay credentials from `lookup`. Blank values count as unset.
    ///
    /// Secret resolution order:
    /// 1. SPOTIFY_CLIENT_SECRET
    /// 2. client_secret_file
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> common::Result<()> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = lookup(ENV_CLIENT_ID) {
            self.spotify.client_id = Some(id);
        }
        if let Some(uri) = lookup(ENV_REDIRECT_URI) {
            self.spotify.redirect_uri = Some(uri);
        }

        if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
            self.spotify.client_secret = Some(Secret::new(secret));
        } else if let Some(ref file) = self.spotify.client_secret_file {
            let secret = std::fs::read_to_string(file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    file.display()
                ))
            })?;
            let secret = Secret::new(secret.trim().to_owned());
            if !secret.is_blank() {
                self.spotify.client_secret = Some(secret);
            }
        }

        Ok(())
    }

    fn validate(&self) -> common::Result<()> {
        for (field, url) in [
            ("spotify.accounts_url", &self.spotify.accounts_url),
            ("spotify.api_url", &self.spotify.api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(common::Error::Invalid {
                    field,
                    reason: format!("must start with http:// or https://, got: {url}"),
                });
            }
        }

        if self.server.timeout_secs == 0 {
            return Err(common::Error::Invalid {
                field: "server.timeout_secs",
                reason: "must be greater than 0".into(),
            });
        }

        if self.server.max_connections == 0 {
            return Err(common::Error::Invalid {
                field: "server.max_connections",
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }

    /// Environment variables whose value is still unknown after loading.
    ///
    /// Missing credentials do not stop startup; Spotify rejects the
    /// resulting requests and the routes report token failures.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.spotify.client_id.is_none() {
            missing.push(ENV_CLIENT_ID);
        }
        if self.spotify.client_secret.is_none() {
            missing.push(ENV_CLIENT_SECRET);
        }
        if self.spotify.redirect_uri.is_none() {
            missing.push(ENV_REDIRECT_URI);
        }
        missing
    }

    /// OAuth client settings, with empty strings standing in for anything
    /// missing.
    pub fn oauth(&self) -> OAuthConfig {
        OAuthConfig::new(
            self.spotify.client_id.clone().unwrap_or_default(),
            self.spotify
                .client_secret
                .clone()
                .unwrap_or_else(|| Secret::new(String::new())),
            self.spotify.redirect_uri.clone().unwrap_or_default(),
        )
        .with_accounts_url(&self.spotify.accounts_url)
    }

    /// Resolve the config file from the CLI arg, CONFIG_PATH, or the default
    /// file name when it exists in the working directory.
    pub fn resolve_path(cli_path: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(PathBuf::from(p));
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return Some(PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    }
}
