//! Ledger snapshot - the in-memory view of products and sales that aggregation and export
//! read from.
//!
//! A snapshot is an explicit value: it is loaded from the database, handed by reference to
//! whatever needs it, and refreshed after every write.

use crate::{
    core::{product, sale, stats::DateRange},
    entities::{ProductModel, SaleModel},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Label shown for a sale whose product no longer exists.
pub const UNKNOWN_PRODUCT_LABEL: &str = "Ismeretlen termék";

/// Looks up a product by id in a product list.
#[must_use]
pub fn find_product(products: &[ProductModel], product_id: i64) -> Option<&ProductModel> {
    products.iter().find(|p| p.id == product_id)
}

/// `"name - model"` for `product_id`, or [`UNKNOWN_PRODUCT_LABEL`] for a dangling reference.
#[must_use]
pub fn display_name(products: &[ProductModel], product_id: i64) -> String {
    find_product(products, product_id).map_or_else(
        || UNKNOWN_PRODUCT_LABEL.to_string(),
        ProductModel::display_name,
    )
}

/// Products and sales as of [`LedgerSnapshot::loaded_at`].
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// All products, newest first
    pub products: Vec<ProductModel>,
    /// All sales, newest business day first
    pub sales: Vec<SaleModel>,
    /// When the snapshot was taken
    pub loaded_at: DateTime<Utc>,
}

impl LedgerSnapshot {
    /// Wraps already-loaded collections.
    #[must_use]
    pub fn new(products: Vec<ProductModel>, sales: Vec<SaleModel>) -> Self {
        Self {
            products,
            sales,
            loaded_at: Utc::now(),
        }
    }

    /// Loads both collections from the database.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        let products = product::list_products(db).await?;
        let sales = sale::list_sales(db).await?;
        debug!(
            products = products.len(),
            sales = sales.len(),
            "Ledger snapshot loaded"
        );
        Ok(Self::new(products, sales))
    }

    /// Re-fetches both collections in place.
    pub async fn refresh(&mut self, db: &DatabaseConnection) -> Result<()> {
        *self = Self::load(db).await?;
        Ok(())
    }

    /// The product with `product_id`, if it still exists.
    #[must_use]
    pub fn product(&self, product_id: i64) -> Option<&ProductModel> {
        find_product(&self.products, product_id)
    }

    /// Display name for `product_id`; see [`display_name`].
    #[must_use]
    pub fn display_name(&self, product_id: i64) -> String {
        display_name(&self.products, product_id)
    }

    /// Sales inside `range`, evaluated against the current time.
    #[must_use]
    pub fn sales_in(&self, range: &DateRange) -> Vec<SaleModel> {
        range.filter(&self.sales, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sale::SaleInput;
    use crate::entities::Platform;
    use crate::test_utils::*;

    #[test]
    fn test_display_name_handles_dangling_reference() {
        let snapshot = LedgerSnapshot::new(
            vec![product_model(1, "AirPods 2. generáció", "AirPods 2", 45000, 10)],
            Vec::new(),
        );

        assert_eq!(snapshot.display_name(1), "AirPods 2. generáció - AirPods 2");
        assert_eq!(snapshot.display_name(2), UNKNOWN_PRODUCT_LABEL);
        assert!(snapshot.product(2).is_none());
    }

    #[test]
    fn test_sales_in_range() {
        let snapshot = LedgerSnapshot::new(
            Vec::new(),
            vec![
                sale_model(1, 1, day(2024, 3, 1), 1, 60000, 45000, Platform::Webshop),
                sale_model(2, 1, day(2024, 4, 1), 1, 60000, 45000, Platform::Webshop),
            ],
        );

        let march = DateRange::from_days(Some(day(2024, 3, 1)), Some(day(2024, 3, 31)));
        let ids: Vec<i64> = snapshot.sales_in(&march).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(snapshot.sales_in(&DateRange::default()).len(), 2);
    }

    #[tokio::test]
    async fn test_load_and_refresh() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 10).await?;

        let mut snapshot = LedgerSnapshot::load(&db).await?;
        assert_eq!(snapshot.products.len(), 1);
        assert!(snapshot.sales.is_empty());

        crate::core::sale::record_sale(
            &db,
            SaleInput {
                product_id: product.id,
                quantity: 4,
                sale_price: 60000,
                cost_price: None,
                platform: Platform::Facebook,
                sale_date: day(2024, 3, 5),
            },
        )
        .await?;

        snapshot.refresh(&db).await?;
        assert_eq!(snapshot.sales.len(), 1);
        assert_eq!(
            snapshot.product(product.id).map(|p| p.stock_quantity),
            Some(6)
        );
        Ok(())
    }
}
