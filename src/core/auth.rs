//! Operator authentication and session tracking.
//!
//! The ledger has one operator account, identified by an email/password pair. Logging in
//! from a chat account opens a session for that account; every ledger command requires a
//! live session. Sessions expire after a fixed lifetime and are kept in memory only.

use crate::errors::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// The operator's credential pair.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The operator's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim()) && self.password == password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated session for one chat user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Chat user id that logged in
    pub user_id: String,
    /// Email used to log in
    pub email: String,
    /// When the session was opened
    pub login_at: DateTime<Utc>,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

/// In-memory session table keyed by chat user id.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    lifetime: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions last `session_hours`.
    #[must_use]
    pub fn new(session_hours: i64) -> Self {
        Self {
            sessions: HashMap::new(),
            lifetime: Duration::hours(session_hours),
        }
    }

    /// Logs `user_id` in with the given credential pair.
    ///
    /// # Errors
    /// - [`Error::Validation`] when email or password is empty
    /// - [`Error::InvalidCredentials`] when the pair does not match
    pub fn login(
        &mut self,
        user_id: &str,
        email: &str,
        password: &str,
        credentials: &Credentials,
    ) -> Result<Session> {
        self.login_at(user_id, email, password, credentials, Utc::now())
    }

    /// [`SessionStore::login`] with an explicit clock.
    pub fn login_at(
        &mut self,
        user_id: &str,
        email: &str,
        password: &str,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(Error::validation("email", "Email is required"));
        }
        if password.is_empty() {
            return Err(Error::validation("password", "Password is required"));
        }
        if !credentials.matches(email, password) {
            warn!(user_id, "Rejected login attempt");
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            user_id: user_id.to_string(),
            email: credentials.email().to_string(),
            login_at: now,
            expires_at: now + self.lifetime,
        };
        self.sessions.insert(user_id.to_string(), session.clone());
        info!(user_id, "Session opened");
        Ok(session)
    }

    /// Returns the live session for `user_id`.
    ///
    /// # Errors
    /// [`Error::Unauthorized`] when there is no session or it has expired. Expired sessions
    /// are removed.
    pub fn require(&mut self, user_id: &str) -> Result<Session> {
        self.require_at(user_id, Utc::now())
    }

    /// [`SessionStore::require`] with an explicit clock.
    pub fn require_at(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<Session> {
        match self.sessions.get(user_id) {
            None => Err(Error::Unauthorized),
            Some(session) if now > session.expires_at => {
                self.sessions.remove(user_id);
                Err(Error::Unauthorized)
            }
            Some(session) => Ok(session.clone()),
        }
    }

    /// Ends the session for `user_id`. Returns whether one existed.
    pub fn logout(&mut self, user_id: &str) -> bool {
        let existed = self.sessions.remove(user_id).is_some();
        if existed {
            info!(user_id, "Session closed");
        }
        existed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("owner@example.com", "s3cret")
    }

    #[test]
    fn test_login_and_require() -> Result<()> {
        let mut store = SessionStore::new(8);
        let session = store.login("42", "Owner@Example.com ", "s3cret", &credentials())?;

        assert_eq!(session.user_id, "42");
        assert_eq!(session.expires_at - session.login_at, Duration::hours(8));
        assert_eq!(store.require("42")?, session);
        Ok(())
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let mut store = SessionStore::new(8);
        let result = store.login("42", "owner@example.com", "S3CRET", &credentials());
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));
        assert!(matches!(store.require("42").unwrap_err(), Error::Unauthorized));
    }

    #[test]
    fn test_empty_fields_are_validation_errors() {
        let mut store = SessionStore::new(8);
        assert!(matches!(
            store.login("42", "  ", "s3cret", &credentials()).unwrap_err(),
            Error::Validation { field: "email", .. }
        ));
        assert!(matches!(
            store.login("42", "owner@example.com", "", &credentials()).unwrap_err(),
            Error::Validation { field: "password", .. }
        ));
    }

    #[test]
    fn test_expired_session_is_evicted() -> Result<()> {
        let mut store = SessionStore::new(1);
        let start = Utc::now();
        store.login_at("42", "owner@example.com", "s3cret", &credentials(), start)?;

        assert!(store.require_at("42", start + Duration::minutes(59)).is_ok());
        assert!(matches!(
            store.require_at("42", start + Duration::minutes(61)).unwrap_err(),
            Error::Unauthorized
        ));
        assert!(!store.logout("42"));
        Ok(())
    }

    #[test]
    fn test_logout_clears_session() -> Result<()> {
        let mut store = SessionStore::new(8);
        store.login("42", "owner@example.com", "s3cret", &credentials())?;

        assert!(store.logout("42"));
        assert!(matches!(store.require("42").unwrap_err(), Error::Unauthorized));
        Ok(())
    }

    #[test]
    fn test_sessions_are_per_user() -> Result<()> {
        let mut store = SessionStore::new(8);
        store.login("42", "owner@example.com", "s3cret", &credentials())?;
        assert!(store.require("7").is_err());
        Ok(())
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("s3cret"));
    }
}
