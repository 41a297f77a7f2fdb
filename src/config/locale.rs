//! Business-day configuration.
//!
//! Sale days are calendar days in the shop's local time. `LEDGER_UTC_OFFSET` (e.g. `+01:00`)
//! fixes the offset; without it the host's local offset is used, so running the bot with
//! `TZ=Europe/Budapest` also follows daylight saving.

use crate::errors::{Error, Result};
use chrono::{FixedOffset, Local};

/// Offset from `LEDGER_UTC_OFFSET`, or the host's current local offset when unset.
///
/// # Errors
/// [`Error::Config`] when the variable is set but is not an offset such as `+02:00`.
pub fn business_offset() -> Result<FixedOffset> {
    parse_offset(std::env::var("LEDGER_UTC_OFFSET").ok().as_deref())
}

fn parse_offset(raw: Option<&str>) -> Result<FixedOffset> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(*Local::now().offset()),
        Some(value) => value.parse::<FixedOffset>().map_err(|e| Error::Config {
            message: format!("LEDGER_UTC_OFFSET '{value}' is not an offset like +01:00: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(
            parse_offset(Some("+02:00")).unwrap(),
            FixedOffset::east_opt(2 * 3600).unwrap()
        );
        assert_eq!(
            parse_offset(Some(" -05:30 ")).unwrap(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
        );
        assert_eq!(parse_offset(None).unwrap(), *Local::now().offset());
        assert!(matches!(
            parse_offset(Some("Budapest")).unwrap_err(),
            Error::Config { .. }
        ));
    }
}
