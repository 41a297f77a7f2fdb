//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete, plus the
//! parsing of free-text command arguments into ledger types.

/// Autocomplete handlers for product references
pub mod autocomplete;

/// Parsing of product references and dates typed into commands
pub mod parse;
