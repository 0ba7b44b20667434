//! Unified error type.

use thiserror::Error;

/// The error type returned by microblog's fallible operations.
///
/// Application-level outcomes (bad credentials, an unauthenticated delete,
/// an unknown route) are expressed as HTTP [`Response`](crate::Response)
/// values, not as `Error`s. This type surfaces infrastructure failures:
/// binding a port, opening or querying the database, reading configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("database: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
