//! Core business logic - framework-agnostic ledger, aggregation and reporting operations.

/// Operator credentials and sessions
pub mod auth;

/// Product catalog and stock operations
pub mod product;

/// Report building, CSV export and money formatting
pub mod report;

/// Sale recording against stock
pub mod sale;

/// Revenue, cost, profit and inventory aggregation
pub mod stats;

/// In-memory snapshot of products and sales
pub mod store;
