//! Shared, lazily built upstream transport.
//!
//! # Design
//! `SessionCache` holds at most one `Session`. Readers share the lock while a
//! fresh session exists; a rebuild takes the write lock, re-checks freshness
//! and constructs the transport, so concurrent callers never build twice.
//! The write lock covers construction only, never the upstream call that
//! follows. Expiry is lazy: nothing refreshes in the background.
//!
//! Timestamps follow tokio's clock (`tokio::time::Instant`).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// How long a transport is reused before it is rebuilt.
pub const SESSION_TTL: Duration = Duration::from_secs(50 * 60);

/// Per-request timeout for listing calls made through the shared transport.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("failed to build upstream transport: {0}")]
    Build(String),
}

type Builder<T> = Box<dyn Fn() -> Result<T, SessionError> + Send + Sync>;

/// A transport plus the instant it was built.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    created_at: Instant,
}

impl<T> Session<T> {
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

pub struct SessionCache<T> {
    slot: RwLock<Option<Arc<Session<T>>>>,
    ttl: Duration,
    builder: Builder<T>,
}

impl<T> SessionCache<T> {
    pub fn new(
        ttl: Duration,
        builder: impl Fn() -> Result<T, SessionError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            builder: Box::new(builder),
        }
    }

    /// Return the current session, building a new one if there is none or
    /// the current one has outlived the TTL.
    pub async fn acquire(&self) -> Result<Arc<Session<T>>, SessionError> {
        let current = self.fresh(self.slot.read().await.as_ref());
        if let Some(session) = current {
            return Ok(session);
        }

        let mut slot = self.slot.write().await;
        // Another caller may have rebuilt while we waited for the write lock.
        if let Some(session) = self.fresh(slot.as_ref()) {
            return Ok(session);
        }

        debug!("Building upstream transport");
        let session = Arc::new(Session {
            transport: (self.builder)()?,
            created_at: Instant::now(),
        });
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Drop the current session so the next `acquire` starts from a clean
    /// transport (no cookies, no pooled connections).
    pub async fn invalidate(&self) {
        if self.slot.write().await.take().is_some() {
            info!("Upstream session invalidated");
        }
    }

    fn fresh(&self, current: Option<&Arc<Session<T>>>) -> Option<Arc<Session<T>>> {
        current.filter(|s| s.is_fresh(self.ttl)).cloned()
    }
}

impl SessionCache<reqwest::Client> {
    /// Cache of cookie-keeping `reqwest` clients with the listing timeout.
    pub fn for_upstream() -> Self {
        Self::new(SESSION_TTL, || {
            reqwest::Client::builder()
                .cookie_store(true)
                .timeout(LISTING_TIMEOUT)
                .build()
                .map_err(|e| SessionError::Build(e.to_string()))
        })
    }
}
