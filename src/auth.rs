//! Single-owner authentication against the configured credential pair.

use std::fmt;

use tracing::{info, warn};

use crate::session::Session;

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    InvalidUsername,
    InvalidPassword,
}

impl LoginOutcome {
    /// User-facing message for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Self::LoggedIn => "You were logged in",
            Self::InvalidUsername => "Invalid username",
            Self::InvalidPassword => "Invalid password",
        }
    }
}

/// The owner's username and password, compared exactly and case-sensitively.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Checks the username first, then the password.
    pub fn check(&self, username: &str, password: &str) -> LoginOutcome {
        if username != self.username {
            LoginOutcome::InvalidUsername
        } else if password != self.password {
            LoginOutcome::InvalidPassword
        } else {
            LoginOutcome::LoggedIn
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Checks the pair and marks `session` authenticated on success.
pub async fn login(credentials: &Credentials, session: &Session, username: &str, password: &str) -> LoginOutcome {
    let outcome = credentials.check(username, password);
    match outcome {
        LoginOutcome::LoggedIn => {
            session.log_in().await;
            info!(username, "owner logged in");
        }
        failed => warn!(username, reason = failed.message(), "login rejected"),
    }
    outcome
}

/// Clears the authenticated flag. Safe to call on any session.
///
/// Returns whether the request carried a session to log out of.
pub async fn logout(session: &Session) -> bool {
    let existed = session.log_out().await;
    if existed {
        info!("owner logged out");
    }
    existed
}
