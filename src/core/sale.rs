//! Sale business logic - recording sales against stock.
//!
//! Recording a sale is a single database transaction: the product's stock is decremented
//! with a conditional update (`stock >= quantity`) and the sale row is inserted, or nothing
//! happens at all. The per-unit cost is snapshotted on the sale so later purchase price
//! changes never rewrite historical profit.

use crate::{
    entities::{Platform, Product, Sale, product, sale},
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// A sale as submitted by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleInput {
    /// Product being sold
    pub product_id: i64,
    /// Units sold
    pub quantity: i64,
    /// Sale price per unit
    pub sale_price: i64,
    /// Cost per unit; `None` or non-positive falls back to the product's purchase price
    pub cost_price: Option<i64>,
    /// Channel of the sale
    pub platform: Platform,
    /// Business day of the sale
    pub sale_date: NaiveDate,
}

/// A sale that passed every pre-write check, with the cost resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSale {
    /// Product being sold
    pub product_id: i64,
    /// Units sold
    pub quantity: i64,
    /// Sale price per unit
    pub sale_price: i64,
    /// Resolved per-unit cost snapshot
    pub cost_price: i64,
    /// Channel of the sale
    pub platform: Platform,
    /// Sale instant (UTC midnight of the business day)
    pub sale_date: DateTime<Utc>,
}

/// Outcome of [`record_sale`]: the stored sale and the product after the stock decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSale {
    /// The inserted sale
    pub sale: sale::Model,
    /// The product with its decremented stock
    pub product: product::Model,
}

/// Default sale price offered for a product: purchase price plus a 30% markup, rounded
/// half up to whole forints.
#[must_use]
pub const fn suggested_sale_price(purchase_price: i64) -> i64 {
    (purchase_price * 13 + 5) / 10
}

/// The instant a business day is stored as.
#[must_use]
pub fn sale_instant(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Largest quantity accepted for one sale.
pub const MAX_SALE_QUANTITY: i64 = 1_000_000;
/// Largest per-unit sale or cost price accepted, in forints.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// Range checks on the submitted numbers, before any product is looked at.
fn validate_amounts(input: &SaleInput) -> Result<()> {
    if input.quantity < 1 {
        return Err(Error::validation("quantity", "Quantity must be at least 1"));
    }
    if input.quantity > MAX_SALE_QUANTITY {
        return Err(Error::validation(
            "quantity",
            format!("Quantity cannot exceed {MAX_SALE_QUANTITY}"),
        ));
    }
    if input.sale_price < 1 {
        return Err(Error::validation(
            "sale_price",
            "Sale price must be at least 1",
        ));
    }
    if input.sale_price > MAX_UNIT_PRICE {
        return Err(Error::validation(
            "sale_price",
            format!("Sale price cannot exceed {MAX_UNIT_PRICE}"),
        ));
    }
    if input.cost_price.is_some_and(|cost| cost > MAX_UNIT_PRICE) {
        return Err(Error::validation(
            "cost_price",
            format!("Cost price cannot exceed {MAX_UNIT_PRICE}"),
        ));
    }
    Ok(())
}

/// The business day `now` falls on at `offset` from UTC.
#[must_use]
pub fn business_day(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Checks a sale against a product snapshot without touching the database.
///
/// # Errors
/// - [`Error::Validation`] when quantity or a price is out of range
/// - [`Error::ProductNotFound`] when `product_id` is not in `products`
/// - [`Error::InsufficientStock`] when quantity exceeds the product's stock
pub fn validate_sale(input: &SaleInput, products: &[product::Model]) -> Result<ValidatedSale> {
    validate_amounts(input)?;

    let product = products
        .iter()
        .find(|p| p.id == input.product_id)
        .ok_or(Error::ProductNotFound {
            id: input.product_id,
        })?;

    if input.quantity > product.stock_quantity {
        return Err(Error::InsufficientStock {
            product_id: product.id,
            available: product.stock_quantity,
            requested: input.quantity,
        });
    }

    let cost_price = input
        .cost_price
        .filter(|cost| *cost >= 1)
        .unwrap_or(product.purchase_price);

    Ok(ValidatedSale {
        product_id: product.id,
        quantity: input.quantity,
        sale_price: input.sale_price,
        cost_price,
        platform: input.platform,
        sale_date: sale_instant(input.sale_date),
    })
}

/// Records a sale and decrements the product's stock atomically.
///
/// The conditional decrement (`stock >= quantity`) is the first statement of the
/// transaction, so it takes the write lock before anything is read and concurrent sales of
/// the same product queue behind it instead of racing. The product is then read back and
/// checked with [`validate_sale`] against its pre-decrement stock. On any error nothing is
/// written.
///
/// # Errors
/// Everything [`validate_sale`] returns, plus [`Error::Database`] on persistence failures.
#[instrument(skip(db))]
pub async fn record_sale(db: &DatabaseConnection, input: SaleInput) -> Result<RecordedSale> {
    validate_amounts(&input).inspect_err(|e| warn!("Sale rejected: {e}"))?;

    let txn = db.begin().await?;
    let now = Utc::now();

    let decremented = Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).sub(input.quantity),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(now))
        .filter(product::Column::Id.eq(input.product_id))
        .filter(product::Column::StockQuantity.gte(input.quantity))
        .exec(&txn)
        .await?;

    let current = Product::find_by_id(input.product_id).one(&txn).await?;

    if decremented.rows_affected == 0 {
        // Nothing was written; report why from the unchanged row.
        let unchanged: Vec<product::Model> = current.into_iter().collect();
        let error = match validate_sale(&input, &unchanged) {
            Err(e) => e,
            Ok(_) => Error::InsufficientStock {
                product_id: input.product_id,
                available: unchanged.first().map_or(0, |p| p.stock_quantity),
                requested: input.quantity,
            },
        };
        warn!(product_id = input.product_id, "Sale rejected: {error}");
        txn.rollback().await?;
        return Err(error);
    }

    let product = current.ok_or(Error::ProductNotFound {
        id: input.product_id,
    })?;
    let before = product::Model {
        stock_quantity: product.stock_quantity + input.quantity,
        ..product.clone()
    };
    let validated = validate_sale(&input, std::slice::from_ref(&before))?;

    let sale = sale::ActiveModel {
        product_id: Set(validated.product_id),
        sale_date: Set(validated.sale_date),
        quantity: Set(validated.quantity),
        sale_price: Set(validated.sale_price),
        cost_price: Set(validated.cost_price),
        platform: Set(validated.platform),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        sale_id = sale.id,
        product_id = product.id,
        quantity = sale.quantity,
        stock = product.stock_quantity,
        "Sale recorded"
    );
    Ok(RecordedSale { sale, product })
}

/// Lists every sale, newest business day first, then newest insert first.
pub async fn list_sales(db: &DatabaseConnection) -> Result<Vec<sale::Model>> {
    Sale::find()
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::CreatedAt)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The `limit` most recent sales in [`list_sales`] order.
pub async fn list_recent_sales(db: &DatabaseConnection, limit: u64) -> Result<Vec<sale::Model>> {
    Sale::find()
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::CreatedAt)
        .order_by_desc(sale::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::product::get_product_by_id;
    use crate::test_utils::*;

    fn input(product_id: i64, quantity: i64, sale_price: i64, cost_price: Option<i64>) -> SaleInput {
        SaleInput {
            product_id,
            quantity,
            sale_price,
            cost_price,
            platform: Platform::Webshop,
            sale_date: day(2024, 3, 5),
        }
    }

    #[test]
    fn test_suggested_sale_price() {
        assert_eq!(suggested_sale_price(45000), 58500);
        assert_eq!(suggested_sale_price(0), 0);
        // 15 * 1.3 = 19.5 rounds up
        assert_eq!(suggested_sale_price(15), 20);
        // 11 * 1.3 = 14.3 rounds down
        assert_eq!(suggested_sale_price(11), 14);
    }

    #[test]
    fn test_business_day_follows_shop_offset() {
        // 23:30 UTC on 5 March is already 6 March in Budapest (UTC+1)
        let now = sale_instant(day(2024, 3, 5)) + chrono::Duration::minutes(23 * 60 + 30);
        let budapest = FixedOffset::east_opt(3600).unwrap();

        assert_eq!(business_day(now, budapest), day(2024, 3, 6));
        assert_eq!(business_day(now, FixedOffset::east_opt(0).unwrap()), day(2024, 3, 5));
    }

    #[test]
    fn test_validate_sale_against_snapshot() -> Result<()> {
        let products = vec![product_model(1, "AirPods", "AirPods 2", 45000, 10)];

        let validated = validate_sale(&input(1, 3, 60000, Some(44000)), &products)?;
        assert_eq!(validated.cost_price, 44000);
        assert_eq!(validated.sale_date, sale_instant(day(2024, 3, 5)));

        let validated = validate_sale(&input(1, 10, 60000, None), &products)?;
        assert_eq!(validated.cost_price, 45000);

        let validated = validate_sale(&input(1, 1, 60000, Some(0)), &products)?;
        assert_eq!(validated.cost_price, 45000);
        Ok(())
    }

    #[test]
    fn test_validate_sale_errors() {
        let products = vec![product_model(1, "AirPods", "AirPods 2", 45000, 2)];

        assert!(matches!(
            validate_sale(&input(1, 0, 60000, None), &products).unwrap_err(),
            Error::Validation { field: "quantity", .. }
        ));
        assert!(matches!(
            validate_sale(&input(1, 1, 0, None), &products).unwrap_err(),
            Error::Validation { field: "sale_price", .. }
        ));
        assert!(matches!(
            validate_sale(&input(9, 1, 60000, None), &products).unwrap_err(),
            Error::ProductNotFound { id: 9 }
        ));
        assert!(matches!(
            validate_sale(&input(1, 3, 60000, None), &products).unwrap_err(),
            Error::InsufficientStock {
                product_id: 1,
                available: 2,
                requested: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 10).await?;

        let recorded = record_sale(&db, input(product.id, 3, 60000, Some(45000))).await?;

        assert_eq!(recorded.product.stock_quantity, 7);
        assert_eq!(recorded.sale.quantity, 3);
        assert_eq!(recorded.sale.profit(), 45000);
        assert!(recorded.product.updated_at >= product.updated_at);

        let stored = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(stored.stock_quantity, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_sale_can_sell_out() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 3).await?;

        let recorded = record_sale(&db, input(product.id, 3, 60000, None)).await?;
        assert_eq!(recorded.product.stock_quantity, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_sale_insufficient_stock_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 2).await?;

        let result = record_sale(&db, input(product.id, 3, 60000, Some(45000))).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));

        let stored = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(stored.stock_quantity, 2);
        assert!(list_sales(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_sale_cost_snapshot_defaults_to_purchase_price() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 10).await?;

        let recorded = record_sale(&db, input(product.id, 1, 60000, None)).await?;
        assert_eq!(recorded.sale.cost_price, 45000);

        // Later purchase price changes do not touch recorded sales
        let mut changed: product::ActiveModel = recorded.product.into();
        changed.purchase_price = Set(50000);
        changed.update(&db).await?;

        let sales = list_sales(&db).await?;
        assert_eq!(sales[0].cost_price, 45000);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_sale_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;

        let result = record_sale(&db, input(999, 1, 60000, None)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));
        assert!(list_sales(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_sale_validation_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 10).await?;

        assert!(record_sale(&db, input(product.id, 0, 60000, None)).await.is_err());
        assert!(record_sale(&db, input(product.id, 1, -5, None)).await.is_err());

        let stored = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(stored.stock_quantity, 10);
        assert!(list_sales(&db).await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_validate_sale_rejects_oversized_amounts() {
        let products = vec![product_model(1, "AirPods", "AirPods 2", 45000, i64::MAX)];

        assert!(matches!(
            validate_sale(&input(1, MAX_SALE_QUANTITY + 1, 60000, None), &products).unwrap_err(),
            Error::Validation { field: "quantity", .. }
        ));
        assert!(matches!(
            validate_sale(&input(1, 1, i64::MAX, None), &products).unwrap_err(),
            Error::Validation { field: "sale_price", .. }
        ));
        assert!(matches!(
            validate_sale(&input(1, 1, 60000, Some(i64::MAX)), &products).unwrap_err(),
            Error::Validation { field: "cost_price", .. }
        ));

        let largest = validate_sale(
            &input(1, MAX_SALE_QUANTITY, MAX_UNIT_PRICE, None),
            &products,
        )
        .unwrap();
        assert_eq!(largest.quantity, MAX_SALE_QUANTITY);
    }

    #[tokio::test]
    async fn test_concurrent_sales_of_last_unit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("ledger.sqlite").display()
        );
        let db = sea_orm::Database::connect(&url).await?;
        crate::config::database::create_tables(&db).await?;
        let product = create_test_product(&db, 45000, 1).await?;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..5 {
            let db = db.clone();
            let sale = input(product.id, 1, 60000, None);
            tasks.spawn(async move { record_sale(&db, sale).await });
        }

        let mut recorded = 0;
        let mut sold_out = 0;
        while let Some(outcome) = tasks.join_next().await {
            match outcome.unwrap() {
                Ok(_) => recorded += 1,
                Err(Error::InsufficientStock {
                    available: 0,
                    requested: 1,
                    ..
                }) => sold_out += 1,
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }

        assert_eq!(recorded, 1);
        assert_eq!(sold_out, 4);
        let stored = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(stored.stock_quantity, 0);
        assert_eq!(list_sales(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_sales_order() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, 45000, 10).await?;

        let march = record_sale(&db, input(product.id, 1, 60000, None)).await?;
        let april = record_sale(
            &db,
            SaleInput {
                sale_date: day(2024, 4, 1),
                ..input(product.id, 1, 60000, None)
            },
        )
        .await?;
        let march_later = record_sale(&db, input(product.id, 1, 60000, None)).await?;

        let ids: Vec<i64> = list_sales(&db).await?.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![april.sale.id, march_later.sale.id, march.sale.id]);

        let recent = list_recent_sales(&db, 2).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, april.sale.id);
        Ok(())
    }
}
