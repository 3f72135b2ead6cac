//! Refresh token storage
//!
//! The proxy is single-tenant: one refresh token for the whole process.
//! Routes only see the [`SessionStore`] trait so the in-memory store can be
//! swapped for a datastore-backed one without touching them.
//!
//! Concurrent writers are not ordered. Two overlapping `/callback` requests
//! both succeed and the last `set` wins.

use std::future::Future;
use std::pin::Pin;

use common::Secret;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

/// Holder for the current refresh token.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn SessionStore>`).
pub trait SessionStore: Send + Sync {
    /// Current refresh token, or `None` before the first successful login.
    fn get(&self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;

    /// Replace the stored refresh token.
    fn set(&self, refresh_token: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Process-memory store. Empty at startup, lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    refresh_token: RwLock<Option<Secret<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            let token = self.refresh_token.read().await;
            Ok(token.as_ref().map(|t| t.expose().clone()))
        })
    }

    fn set(&self, refresh_token: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            *self.refresh_token.write().await = Some(Secret::new(refresh_token));
            debug!("refresh token stored");
            Ok(())
        })
    }
}
