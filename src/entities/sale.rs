//! Sale entity - One append-only sale record.
//!
//! `cost_price` is a snapshot of the per-unit cost at the time of sale and is never
//! recomputed from the product's current purchase price. `product_id` is an advisory
//! reference: no foreign key is declared, so a sale may outlive its product.

use super::platform::Platform;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier, assigned on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the product sold
    pub product_id: i64,
    /// Business date of the sale (stored as UTC midnight of the chosen day)
    pub sale_date: DateTimeUtc,
    /// Units sold, at least 1
    pub quantity: i64,
    /// Sale price per unit in whole forints
    pub sale_price: i64,
    /// Cost per unit at the time of sale
    pub cost_price: i64,
    /// Channel the sale happened on
    pub platform: Platform,
    /// Insert time, used as a secondary ordering key
    pub created_at: DateTimeUtc,
}

impl Model {
    /// `sale_price × quantity`, saturating at the `i64` bounds
    #[must_use]
    pub const fn revenue(&self) -> i64 {
        self.sale_price.saturating_mul(self.quantity)
    }

    /// `cost_price × quantity`, saturating at the `i64` bounds
    #[must_use]
    pub const fn cost(&self) -> i64 {
        self.cost_price.saturating_mul(self.quantity)
    }

    /// `revenue - cost`
    #[must_use]
    pub const fn profit(&self) -> i64 {
        self.revenue().saturating_sub(self.cost())
    }
}

/// Sales have no enforced relations; see the module docs.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use crate::entities::Platform;
    use crate::test_utils::{day, sale_model};

    #[test]
    fn test_sale_figures() {
        let sale = sale_model(1, 1, day(2024, 3, 5), 3, 60000, 45000, Platform::Webshop);
        assert_eq!(sale.revenue(), 180_000);
        assert_eq!(sale.cost(), 135_000);
        assert_eq!(sale.profit(), 45000);
    }

    #[test]
    fn test_sale_figures_saturate_instead_of_overflowing() {
        let sale = sale_model(1, 1, day(2024, 3, 5), i64::MAX, 2, i64::MAX, Platform::Webshop);
        assert_eq!(sale.revenue(), i64::MAX);
        assert_eq!(sale.cost(), i64::MAX);
        assert_eq!(sale.profit(), 0);
    }
}
