//! Entity module - SeaORM entity definitions for the `products` and `sales` tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod platform;
pub mod product;
pub mod sale;

pub use platform::Platform;
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
