//! Browser sessions on top of `tower-sessions`.
//!
//! The session layer owns the cookie and the store. This module only defines
//! what the microblog keeps in a record ([`SessionData`]) and a typed
//! [`Session`] handle that handlers read and write through.
//!
//! Nothing is stored until a handler writes: a visitor who only reads pages
//! never receives a cookie.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::error;

/// Name of the cookie that carries the session id.
pub const COOKIE_NAME: &str = "session";

const DATA_KEY: &str = "microblog.data";

// Caps the idle TTL so the cookie expiry date stays representable.
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Everything the microblog remembers about one browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub logged_in: bool,
    pub flashes: Vec<String>,
}

/// Session middleware with an in-memory store and an idle expiry of `ttl`.
///
/// The cookie is `HttpOnly` and `SameSite=Lax`. It is not marked `Secure`
/// because the microblog serves plain HTTP and expects TLS to terminate in
/// front of it.
pub fn layer(ttl: Duration) -> SessionManagerLayer<MemoryStore> {
    let idle = time::Duration::try_from(ttl.min(MAX_TTL)).unwrap_or(time::Duration::DAY);
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(idle))
}

/// Per-request handle onto one session record.
///
/// Cloning is cheap; all clones address the same record. Store failures are
/// logged and treated as an empty session.
#[derive(Debug, Clone)]
pub struct Session(pub(crate) tower_sessions::Session);

impl Session {
    pub fn new(inner: tower_sessions::Session) -> Self {
        Self(inner)
    }

    /// `None` when the request carried no live session.
    pub async fn data(&self) -> Option<SessionData> {
        match self.0.get::<SessionData>(DATA_KEY).await {
            Ok(data) => data,
            Err(e) => {
                error!("session load failed: {e}");
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.data().await.is_some_and(|data| data.logged_in)
    }

    /// Marks the session authenticated under a fresh id, so an id handed out
    /// before login cannot be replayed afterwards.
    pub async fn log_in(&self) {
        if let Err(e) = self.0.cycle_id().await {
            error!("session id rotation failed: {e}");
        }
        let mut data = self.data().await.unwrap_or_default();
        data.logged_in = true;
        self.store(&data).await;
    }

    /// Clears the authenticated flag.
    ///
    /// Returns `false`, and stores nothing, when there was no session to log
    /// out of.
    pub async fn log_out(&self) -> bool {
        let Some(mut data) = self.data().await else {
            return false;
        };
        data.logged_in = false;
        self.store(&data).await;
        true
    }

    /// Queues a message for the next rendered page.
    pub async fn flash(&self, message: impl Into<String>) {
        let mut data = self.data().await.unwrap_or_default();
        data.flashes.push(message.into());
        self.store(&data).await;
    }

    /// Removes and returns every queued flash message, oldest first.
    pub async fn take_flashes(&self) -> Vec<String> {
        let Some(mut data) = self.data().await else {
            return Vec::new();
        };
        if data.flashes.is_empty() {
            return Vec::new();
        }
        let flashes = std::mem::take(&mut data.flashes);
        self.store(&data).await;
        flashes
    }

    async fn store(&self, data: &SessionData) {
        if let Err(e) = self.0.insert(DATA_KEY, data).await {
            error!("session save failed: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) fn detached() -> Session {
    use std::sync::Arc;
    Session::new(tower_sessions::Session::new(None, Arc::new(MemoryStore::default()), None))
}
