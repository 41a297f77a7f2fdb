/// Login credentials and session lifetime from environment variables
pub mod auth;

/// Seed product catalog loading from config.toml
pub mod catalog;

/// Shop time zone offset for business days
pub mod locale;

/// Database connection, table creation and health probing
pub mod database;
