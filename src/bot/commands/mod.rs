//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Login and logout commands
pub mod auth;

/// General utility commands
pub mod general;

/// Product and stock management commands
pub mod product;

/// Stats and report commands
pub mod report;

/// Sale commands
pub mod sale;

// Export commands
pub use auth::*;
pub use general::*;
pub use product::*;
pub use report::*;
pub use sale::*;
