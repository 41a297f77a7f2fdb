//! Product business logic - catalog and stock level operations.
//!
//! Products are created with coerced numeric fields, listed newest first, and their stock is
//! changed either by an absolute set or by an atomic increment. Sales decrement stock through
//! `core::sale`. Deleting a product is refused while any sale references it.

use crate::{
    entities::{Product, Sale, product, sale},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// Raw product fields as typed by the operator.
///
/// The numeric fields are text: they are coerced with [`coerce_non_negative`], so a blank
/// or malformed value becomes `0` instead of an error.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    /// Product name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Purchase price per unit
    pub purchase_price: String,
    /// Initial stock
    pub stock_quantity: String,
}

/// Coerces operator text to a non-negative integer.
///
/// Leading whitespace and an optional sign are accepted, then as many digits as follow;
/// anything after the digits is ignored (`"12 db"` → 12, `"3.7"` → 3). Text with no leading
/// digits, negative values and values that overflow `i64` all become 0.
#[must_use]
pub fn coerce_non_negative(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if negative {
        return 0;
    }

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse::<i64>().unwrap_or(0)
}

/// Creates a product from operator input.
///
/// Name and model are trimmed and must not be empty. Duplicate name/model pairs are allowed.
///
/// # Errors
/// - [`Error::Validation`] when name or model is blank
/// - [`Error::Database`] when the insert fails
#[instrument(skip(db))]
pub async fn record_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model> {
    let name = input.name.trim();
    let model = input.model.trim();

    if name.is_empty() {
        return Err(Error::validation("name", "Product name cannot be empty"));
    }
    if model.is_empty() {
        return Err(Error::validation("model", "Product model cannot be empty"));
    }

    let now = chrono::Utc::now();
    let created = product::ActiveModel {
        name: Set(name.to_string()),
        model: Set(model.to_string()),
        purchase_price: Set(coerce_non_negative(&input.purchase_price)),
        stock_quantity: Set(coerce_non_negative(&input.stock_quantity)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        product_id = created.id,
        stock = created.stock_quantity,
        "Product recorded"
    );
    Ok(created)
}

/// Lists every product, newest first.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_desc(product::Column::CreatedAt)
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id, `None` if it does not exist.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces a product's stock level outright.
///
/// # Errors
/// - [`Error::Validation`] when `new_quantity` is negative
/// - [`Error::ProductNotFound`] when the product does not exist
#[instrument(skip(db))]
pub async fn set_stock(
    db: &DatabaseConnection,
    product_id: i64,
    new_quantity: i64,
) -> Result<product::Model> {
    if new_quantity < 0 {
        return Err(Error::validation(
            "stock_quantity",
            "Stock cannot be negative",
        ));
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.stock_quantity = Set(new_quantity);
    product.updated_at = Set(chrono::Utc::now());

    let updated = product.update(db).await?;
    info!(product_id, stock = updated.stock_quantity, "Stock set");
    Ok(updated)
}

/// Adds `amount` units to a product's stock in a single atomic update.
///
/// # Errors
/// - [`Error::Validation`] when `amount` is not positive
/// - [`Error::ProductNotFound`] when the product does not exist
#[instrument(skip(db))]
pub async fn add_stock(
    db: &DatabaseConnection,
    product_id: i64,
    amount: i64,
) -> Result<product::Model> {
    if amount < 1 {
        return Err(Error::validation(
            "amount",
            "Amount to add must be at least 1",
        ));
    }

    let result = Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).add(amount),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }

    let updated = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    info!(product_id, amount, stock = updated.stock_quantity, "Stock added");
    Ok(updated)
}

/// Deletes a product that no sale references.
///
/// # Errors
/// - [`Error::ProductNotFound`] when the product does not exist
/// - [`Error::ProductInUse`] when at least one sale references it
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let referencing = Sale::find()
        .filter(sale::Column::ProductId.eq(product_id))
        .count(db)
        .await?;
    if referencing > 0 {
        warn!(product_id, referencing, "Refused to delete product with sales");
        return Err(Error::ProductInUse {
            id: product_id,
            sales: referencing,
        });
    }

    Product::delete_by_id(product_id).exec(db).await?;
    info!(product_id, "Product deleted");
    Ok(product)
}
