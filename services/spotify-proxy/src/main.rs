//! Spotify OAuth Proxy
//!
//! Single-binary service that:
//! 1. Runs the authorization-code flow (`/login`, `/callback`)
//! 2. Keeps the resulting refresh token in memory
//! 3. Re-exposes top tracks, now playing, play and pause as simplified
//!    JSON routes, minting a fresh access token for every call

mod config;
mod error;
mod metrics;
mod routes;

#[cfg(test)]
mod mock_spotify;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use spotify_api::WebApi;
use spotify_auth::{MemorySessionStore, TokenManager};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// How long in-flight requests may take to finish after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub(crate) struct AppState {
    pub tokens: Arc<TokenManager>,
    pub api: WebApi,
    pub strict_playback: bool,
    pub started_at: Instant,
    pub prometheus: PrometheusHandle,
}

/// Build the axum router with all routes and shared state.
fn build_router(state: AppState, max_connections: usize) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::metrics))
        .route("/login", get(routes::auth::login))
        .route("/callback", get(routes::auth::callback))
        .route("/spotify/top-tracks", get(routes::player::top_tracks))
        .route("/spotify/now-playing", get(routes::player::now_playing))
        .route("/spotify/play", post(routes::player::play))
        .route("/spotify/pause", post(routes::player::pause))
        .layer(axum::middleware::from_fn(metrics::track_requests))
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_connections))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in production
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting spotify-proxy");
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded environment file");
    }

    // Install Prometheus metrics recorder before any metrics are emitted
    let prometheus = metrics::install_recorder()?;

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    let config = match &config_path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Config::load(Some(path.as_path()))
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => {
            info!("no config file, using defaults and environment");
            Config::load(None).context("invalid configuration")?
        }
    };

    for variable in config.missing_credentials() {
        warn!(
            variable,
            "credential not set, spotify will reject token requests"
        );
    }

    info!(
        listen_addr = %config.server.listen_addr,
        accounts_url = %config.spotify.accounts_url,
        api_url = %config.spotify.api_url,
        timeout_secs = config.server.timeout_secs,
        strict_playback = config.spotify.strict_playback,
        "configuration loaded"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.server.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let state = AppState {
        tokens: Arc::new(TokenManager::new(
            http.clone(),
            config.oauth(),
            Arc::new(MemorySessionStore::new()),
        )),
        api: WebApi::new(http, config.spotify.api_url.clone()),
        strict_playback: config.spotify.strict_playback,
        started_at: Instant::now(),
        prometheus,
    };

    let app = build_router(state, config.server.max_connections);

    let listen_addr = config.server.listen_addr;
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind to {listen_addr}"))?;
    info!(addr = %listen_addr, "accepting requests");

    // The drain deadline starts at signal receipt, not at server start.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(DRAIN_TIMEOUT, server_handle).await {
        Ok(Ok(Ok(()))) => info!("all in-flight requests drained"),
        Ok(Ok(Err(e))) => error!(error = %e, "server error during shutdown"),
        Ok(Err(e)) => error!(error = %e, "server task panicked"),
        Err(_) => warn!(
            drain_timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "drain timeout exceeded, forcing shutdown"
        ),
    }

    info!("shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
