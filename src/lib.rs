//! Resale Ledger - A Discord bot for a small resale business
//!
//! This crate keeps the product catalog, stock levels and sales of a one-operator resale
//! shop, records sales atomically against stock, and turns the sales history into
//! statistics and CSV reports, all accessible via Discord behind a login.

#![deny(
    unsafe_code,
    unused_must_use,
    unreachable_patterns,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]
#![warn(
    missing_docs,
    future_incompatible,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::too_many_lines,
    clippy::wildcard_imports
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic product, sale, statistics and report operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
