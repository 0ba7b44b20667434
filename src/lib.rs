//! # microblog
//!
//! A single-user microblog served over HTTP. Visitors read and search
//! entries; the owner logs in to post and delete them.
//!
//! ## Routes
//!
//! | Method | Path | Behaviour |
//! |---|---|---|
//! | `GET` | `/` | every entry, oldest first |
//! | `GET`/`POST` | `/login` | login form / credential check |
//! | `GET` | `/logout` | clears the session flag |
//! | `POST` | `/add` | owner only, then redirect to `/` |
//! | `GET` | `/delete/{id}` | JSON `{"status": 0 \| 1, "message": …}` |
//! | `GET` | `/search/?query=…` | case-insensitive substring search |
//! | `GET` | `/healthz`, `/readyz` | probes |
//!
//! ## The pieces
//!
//! - A small HTTP layer on hyper: radix-tree routing via [`matchit`],
//!   handlers that receive shared state as `Arc<S>`, graceful shutdown.
//! - Server-side sessions from `tower-sessions`, read through a typed
//!   [`Session`] handle.
//! - SQLite storage through `tokio-rusqlite` ([`EntryStore`]).
//!
//! ## Running it
//!
//! ```rust,no_run
//! use microblog::{App, Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> microblog::Result<()> {
//!     let config = Config::load()?;
//!     let addr = config.bind;
//!     let app = App::new(config).await?;
//!     Server::bind(addr).serve(microblog::router(app)).await
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod auth;
pub mod config;
pub mod entry;
pub mod handlers;
pub mod health;
pub mod session;
pub mod store;
pub mod view;

pub use app::{App, router};
pub use config::Config;
pub use entry::{Entry, NewEntry};
pub use error::{Error, Result};
pub use handler::Handler;
pub use method::Method;
pub use request::{Form, Request};
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use session::{Session, SessionData};
pub use status::Status;
pub use store::EntryStore;
