//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`, so the
//! schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Product, Sale};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/resale_ledger.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to a
/// local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Local file path of a `sqlite://` URL, without the query string. `None` for in-memory
/// databases and other backends.
#[must_use]
pub fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(Path::new(path))
    }
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// The parent directory of a `SQLite` file is created first; `mode=rwc` only creates the
/// file itself.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_path(&database_url)
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the `products` and `sales` tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    let mut sale_table = schema.create_table_from_entity(Sale);

    product_table.if_not_exists();
    sale_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&sale_table)).await?;

    Ok(())
}

/// Result of a database round-trip probe.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the probe succeeded
    pub healthy: bool,
    /// Time the probe took
    pub response_time: Duration,
    /// Failure reason when unhealthy
    pub error: Option<String>,
}

impl HealthStatus {
    /// One-line status message, e.g. `"Connection OK (3 ms)"`.
    #[must_use]
    pub fn message(&self) -> String {
        let millis = self.response_time.as_millis();
        match &self.error {
            None => format!("Connection OK ({millis} ms)"),
            Some(reason) => format!("Connection failed after {millis} ms: {reason}"),
        }
    }
}

/// Pings the database and measures how long the round trip took.
///
/// Never fails; a failed ping is reported through [`HealthStatus::error`].
pub async fn check_connection_health(db: &DatabaseConnection) -> HealthStatus {
    let started = Instant::now();
    let outcome = db.ping().await;
    let response_time = started.elapsed();

    match outcome {
        Ok(()) => HealthStatus {
            healthy: true,
            response_time,
            error: None,
        },
        Err(e) => {
            warn!("Database health check failed: {e}");
            HealthStatus {
                healthy: false,
                response_time,
                error: Some(e.to_string()),
            }
        }
    }
}
