//! Application state and route table.

use std::sync::Arc;

use tracing::info;

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::Result;
use crate::router::Router;
use crate::session;
use crate::store::EntryStore;
use crate::{handlers, health};

/// Everything a handler can reach. Built once at startup and shared.
pub struct App {
    pub config: Config,
    pub credentials: Credentials,
    pub store: EntryStore,
}

impl App {
    /// Opens the configured database (the isolated test file when
    /// `testing` is set).
    pub async fn new(config: Config) -> Result<Self> {
        let path = config.database_path();
        info!(database = %path.display(), testing = config.testing, "opening entry store");
        let store = EntryStore::open(&path).await?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: EntryStore) -> Self {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        Self { config, credentials, store }
    }
}

/// Builds the microblog's route table around `app`.
pub fn router(app: App) -> Router<App> {
    let sessions = session::layer(app.config.session_ttl());
    Router::new(Arc::new(app), sessions)
        .get("/", handlers::index)
        .get("/login", handlers::login_form)
        .post("/login", handlers::login)
        .get("/logout", handlers::logout)
        .post("/add", handlers::add)
        .get("/delete/{id}", handlers::delete)
        .get("/search", handlers::search)
        .get("/search/", handlers::search)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}
