//! Login credential configuration from environment variables.
//!
//! The ledger has a single operator account. Its credential pair and the session lifetime
//! are read from `.env` / the process environment.

use crate::{
    core::auth::Credentials,
    errors::{Error, Result},
};

const DEFAULT_SESSION_HOURS: i64 = 8;

/// Reads `LEDGER_LOGIN_EMAIL` and `LEDGER_LOGIN_PASSWORD`.
///
/// # Errors
/// Returns [`Error::EnvVar`] when either variable is missing, or [`Error::Config`] when one
/// of them is blank.
pub fn load_credentials() -> Result<Credentials> {
    let email = std::env::var("LEDGER_LOGIN_EMAIL")?;
    let password = std::env::var("LEDGER_LOGIN_PASSWORD")?;

    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Config {
            message: "LEDGER_LOGIN_EMAIL and LEDGER_LOGIN_PASSWORD must not be empty".to_string(),
        });
    }

    Ok(Credentials::new(email.trim(), password))
}

/// Session lifetime in hours from `LEDGER_SESSION_HOURS`, defaulting to 8.
#[must_use]
pub fn session_hours() -> i64 {
    parse_session_hours(std::env::var("LEDGER_SESSION_HOURS").ok().as_deref())
}

fn parse_session_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|hours| *hours > 0)
        .unwrap_or(DEFAULT_SESSION_HOURS)
}
