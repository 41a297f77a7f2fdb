//! Parsing of free-text command arguments.

use crate::errors::{Error, Result};
use chrono::NaiveDate;

/// Reads the product id out of a reference such as `#3 AirPods Pro 2 (5 db)` or `3`.
#[must_use]
pub fn parse_product_ref(raw: &str) -> Option<i64> {
    let trimmed = raw.trim().trim_start_matches('#');
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Like [`parse_product_ref`], but a missing id is a validation error.
pub fn require_product_ref(raw: &str) -> Result<i64> {
    parse_product_ref(raw).ok_or_else(|| {
        Error::validation("product", format!("'{raw}' is not a product from the list"))
    })
}

/// Parses an optional `YYYY-MM-DD` argument.
///
/// # Errors
/// [`Error::Validation`] naming `field` when the text is not a valid date.
pub fn parse_day(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                Error::validation(field, format!("'{value}' is not a YYYY-MM-DD date"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_product_ref() {
        assert_eq!(parse_product_ref("#3 AirPods Pro 2 (5 db)"), Some(3));
        assert_eq!(parse_product_ref(" 42 "), Some(42));
        assert_eq!(parse_product_ref("AirPods"), None);
        assert_eq!(parse_product_ref(""), None);
    }

    #[test]
    fn test_require_product_ref() {
        assert_eq!(require_product_ref("#7").unwrap(), 7);
        assert!(matches!(
            require_product_ref("AirPods").unwrap_err(),
            Error::Validation { field: "product", .. }
        ));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("start", None).unwrap(), None);
        assert_eq!(parse_day("start", Some("  ")).unwrap(), None);
        assert_eq!(
            parse_day("start", Some("2024-03-05")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert!(matches!(
            parse_day("end", Some("2024-13-01")).unwrap_err(),
            Error::Validation { field: "end", .. }
        ));
    }
}
