//! Application configuration.
//!
//! Values come from defaults, then an optional TOML file named by
//! `MICROBLOG_CONFIG`, then environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `MICROBLOG_USERNAME` | `username` |
//! | `MICROBLOG_PASSWORD` | `password` |
//! | `DATABASE_URL` | `database` (`sqlite:///relative.db`, `sqlite:////abs.db`, or a bare path) |
//! | `MICROBLOG_TESTING` | `testing` |
//! | `MICROBLOG_BIND` | `bind` |
//! | `MICROBLOG_SESSION_TTL_SECS` | `session_ttl_secs` |

use std::env::{self, VarError};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// File name used for the isolated database when `testing` is set.
pub const TEST_DATABASE: &str = "test.db";

/// Environment variables [`Config::load`] reads.
pub const ENV_VARS: [&str; 6] = [
    "MICROBLOG_USERNAME",
    "MICROBLOG_PASSWORD",
    "DATABASE_URL",
    "MICROBLOG_TESTING",
    "MICROBLOG_BIND",
    "MICROBLOG_SESSION_TTL_SECS",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub database: PathBuf,
    pub testing: bool,
    pub bind: SocketAddr,
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
            database: PathBuf::from("microblog.db"),
            testing: false,
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            session_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl Config {
    /// Loads the file named by `MICROBLOG_CONFIG` (if any) and applies the
    /// process environment on top.
    pub fn load() -> Result<Self> {
        let base = match env::var_os("MICROBLOG_CONFIG") {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        let mut vars = Vec::new();
        for name in ENV_VARS {
            if let Some(value) = env_value(name, env::var(name))? {
                vars.push((name.to_owned(), value));
            }
        }
        base.apply_env(vars)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overrides fields from `(name, value)` pairs; unrelated names are ignored.
    pub fn apply_env<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                "MICROBLOG_USERNAME" => self.username = value,
                "MICROBLOG_PASSWORD" => self.password = value,
                "DATABASE_URL" => self.database = parse_database_url(&value),
                "MICROBLOG_TESTING" => self.testing = parse_bool(&name, &value)?,
                "MICROBLOG_BIND" => {
                    self.bind = value
                        .parse()
                        .map_err(|e| Error::Config(format!("{name}={value}: {e}")))?;
                }
                "MICROBLOG_SESSION_TTL_SECS" => {
                    self.session_ttl_secs = value
                        .parse()
                        .map_err(|e| Error::Config(format!("{name}={value}: {e}")))?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Database file actually opened: the configured one, or an isolated
    /// `test.db` beside it when `testing` is set.
    pub fn database_path(&self) -> PathBuf {
        if self.testing {
            self.database.with_file_name(TEST_DATABASE)
        } else {
            self.database.clone()
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// An unset variable is skipped; one that is not valid UTF-8 is an error
/// rather than silently ignored.
fn env_value(name: &str, value: std::result::Result<String, VarError>) -> Result<Option<String>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => {
            Err(Error::Config(format!("{name}={}: not valid UTF-8", raw.to_string_lossy())))
        }
    }
}

fn parse_database_url(value: &str) -> PathBuf {
    match value.strip_prefix("sqlite://") {
        // sqlite:///rel.db is relative, sqlite:////abs.db is absolute
        Some(rest) => PathBuf::from(rest.strip_prefix('/').unwrap_or(rest)),
        None => PathBuf::from(value),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{name}={value}: expected a boolean"))),
    }
}
