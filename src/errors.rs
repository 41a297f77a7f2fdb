//! Unified error type for the ledger.
//!
//! Every core operation returns [`Result`]. The `Display` text of each variant is the short
//! summary shown to the user; the `Debug` form carries the full detail and is only logged.

use thiserror::Error;

/// All errors the ledger can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A missing or out-of-range input field; the operation was not attempted
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// The referenced product does not exist
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// The requested sale quantity exceeds the stock on hand
    #[error(
        "Insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        /// Product being sold
        product_id: i64,
        /// Units currently in stock
        available: i64,
        /// Units requested by the sale
        requested: i64,
    },

    /// The product still has sales referencing it
    #[error("Product {id} cannot be deleted: {sales} sale(s) reference it")]
    ProductInUse {
        /// Product id
        id: i64,
        /// Number of referencing sales
        sales: u64,
    },

    /// No live session for the caller
    #[error("Not logged in. Use /login first")]
    Unauthorized,

    /// Credential pair did not match
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The persistence layer failed (connection, constraint, query)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// CSV serialization failed
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export produced bytes that are not UTF-8
    #[error("Export encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Missing environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion overflow
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Discord framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error is caused by the caller's input or the ledger's state, as opposed
    /// to an infrastructure failure. These are answered inline and not logged as failures.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::ProductNotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::ProductInUse { .. }
                | Self::Unauthorized
                | Self::InvalidCredentials
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
