//! Product entity - One resellable product type and its stock on hand.
//!
//! `stock_quantity` is only changed through the ledger operations in `core::product` and
//! `core::sale`; every stock mutation refreshes `updated_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier, assigned on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product name (e.g., "AirPods 3. generáció")
    pub name: String,
    /// Model designation (e.g., "AirPods 3")
    pub model: String,
    /// Purchase price per unit in whole forints
    pub purchase_price: i64,
    /// Units currently in stock, never negative
    pub stock_quantity: i64,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product (or its stock) was last modified
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Display name used in listings and reports: `"name - model"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.model)
    }
}

/// Products have no enforced relations; sales reference them by id only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
