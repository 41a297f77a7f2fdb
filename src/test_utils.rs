//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory database, creating products and
//! sales through the real ledger operations, and building plain models for the pure
//! aggregation tests.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        product::{self, ProductInput},
        sale::{self, RecordedSale, SaleInput},
    },
    entities::{Platform, ProductModel, SaleModel},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar day.
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test product named "AirPods 2. generáció" / "AirPods 2".
pub async fn create_test_product(
    db: &DatabaseConnection,
    purchase_price: i64,
    stock_quantity: i64,
) -> Result<ProductModel> {
    create_custom_product(db, "AirPods 2. generáció", "AirPods 2", purchase_price, stock_quantity)
        .await
}

/// Creates a product with custom name and model.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    model: &str,
    purchase_price: i64,
    stock_quantity: i64,
) -> Result<ProductModel> {
    product::record_product(
        db,
        ProductInput {
            name: name.to_string(),
            model: model.to_string(),
            purchase_price: purchase_price.to_string(),
            stock_quantity: stock_quantity.to_string(),
        },
    )
    .await
}

/// Records a sale of `quantity` units on 2024-03-05 at 60 000 Ft each, with the cost taken
/// from the product's purchase price.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
    platform: Platform,
) -> Result<RecordedSale> {
    sale::record_sale(
        db,
        SaleInput {
            product_id,
            quantity,
            sale_price: 60000,
            cost_price: None,
            platform,
            sale_date: day(2024, 3, 5),
        },
    )
    .await
}

/// Builds a product model without touching a database.
pub fn product_model(
    id: i64,
    name: &str,
    model: &str,
    purchase_price: i64,
    stock_quantity: i64,
) -> ProductModel {
    let now = chrono::Utc::now();
    ProductModel {
        id,
        name: name.to_string(),
        model: model.to_string(),
        purchase_price,
        stock_quantity,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a sale model without touching a database.
pub fn sale_model(
    id: i64,
    product_id: i64,
    date: NaiveDate,
    quantity: i64,
    sale_price: i64,
    cost_price: i64,
    platform: Platform,
) -> SaleModel {
    SaleModel {
        id,
        product_id,
        sale_date: sale::sale_instant(date),
        quantity,
        sale_price,
        cost_price,
        platform,
        created_at: chrono::Utc::now(),
    }
}
