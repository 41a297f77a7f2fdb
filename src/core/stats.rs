//! Aggregation over sales and products.
//!
//! Every function here is pure: it takes slices of models (usually from a
//! [`LedgerSnapshot`](crate::core::store::LedgerSnapshot)) and returns derived figures.
//! Money is whole forints in `i64`; only percentages and averages are `f64`.

use crate::{
    core::store,
    entities::{Platform, ProductModel, SaleModel},
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};

/// Products with fewer units than this count as low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Inclusive date window for filtering sales.
///
/// A range with neither bound set matches every sale, future-dated ones included. Otherwise
/// an unset start means 2000-01-01 and an unset end means "now" at evaluation time. Bounds
/// are instants, so a sale is inside when `start <= sale_date <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound, inclusive
    pub start: Option<DateTime<Utc>>,
    /// Upper bound, inclusive
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Builds a range from calendar days, each mapped to its UTC midnight (the instant sale
    /// days are stored as).
    #[must_use]
    pub fn from_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(crate::core::sale::sale_instant),
            end: end.map(crate::core::sale::sale_instant),
        }
    }

    /// Lower bound used when `start` is unset.
    #[must_use]
    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Resolved `(start, end)` with defaults applied.
    #[must_use]
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start.unwrap_or_else(Self::default_start),
            self.end.unwrap_or(now),
        )
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `instant` lies inside the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let (start, end) = self.bounds(now);
        start <= instant && instant <= end
    }

    /// Sales inside the range, in their original order.
    #[must_use]
    pub fn filter(&self, sales: &[SaleModel], now: DateTime<Utc>) -> Vec<SaleModel> {
        sales
            .iter()
            .filter(|sale| self.contains(sale.sale_date, now))
            .cloned()
            .collect()
    }
}

/// `profit / revenue × 100`, defined as 0 when revenue is 0.
#[must_use]
pub fn profit_percentage(profit: i64, revenue: i64) -> f64 {
    if revenue == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = profit as f64 / revenue as f64;
    ratio * 100.0
}

/// Accumulated revenue, units and profit for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollup {
    /// Σ sale price × quantity
    pub revenue: i64,
    /// Σ quantity
    pub units: i64,
    /// Σ (sale price − cost) × quantity
    pub profit: i64,
}

impl Rollup {
    fn add(&mut self, sale: &SaleModel) {
        self.revenue += sale.revenue();
        self.units += sale.quantity;
        self.profit += sale.profit();
    }

    /// Profit as a percentage of revenue (0 when there is no revenue).
    #[must_use]
    pub fn margin_percent(&self) -> f64 {
        profit_percentage(self.profit, self.revenue)
    }
}

/// Headline figures for a set of sales.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    /// Σ sale price × quantity
    pub total_revenue: i64,
    /// Σ cost price × quantity
    pub total_cost: i64,
    /// `total_revenue − total_cost`
    pub total_profit: i64,
    /// `total_profit / total_revenue × 100`, 0 without revenue
    pub profit_percentage: f64,
    /// Σ quantity
    pub total_units: i64,
    /// Number of sale records
    pub total_sales: usize,
    /// `total_revenue / total_units`, 0 without units
    pub average_sale_price: f64,
    /// Platform with the most units sold
    pub most_popular_platform: Option<Platform>,
}

/// Computes the headline figures for `sales`.
#[must_use]
pub fn summarize(sales: &[SaleModel]) -> LedgerSummary {
    let total_revenue: i64 = sales.iter().map(SaleModel::revenue).sum();
    let total_cost: i64 = sales.iter().map(SaleModel::cost).sum();
    let total_units: i64 = sales.iter().map(|s| s.quantity).sum();
    let total_profit = total_revenue - total_cost;

    #[allow(clippy::cast_precision_loss)]
    let average_sale_price = if total_units > 0 {
        total_revenue as f64 / total_units as f64
    } else {
        0.0
    };

    LedgerSummary {
        total_revenue,
        total_cost,
        total_profit,
        profit_percentage: profit_percentage(total_profit, total_revenue),
        total_units,
        total_sales: sales.len(),
        average_sale_price,
        most_popular_platform: most_popular_platform(sales),
    }
}

/// Rollup for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRollup {
    /// Sales channel
    pub platform: Platform,
    /// Figures for the channel
    pub rollup: Rollup,
}

/// Per-platform rollups in order of each platform's first appearance in `sales`.
#[must_use]
pub fn platform_rollups(sales: &[SaleModel]) -> Vec<PlatformRollup> {
    let mut rollups: Vec<PlatformRollup> = Vec::new();
    for sale in sales {
        if let Some(existing) = rollups.iter_mut().find(|r| r.platform == sale.platform) {
            existing.rollup.add(sale);
        } else {
            let mut rollup = Rollup::default();
            rollup.add(sale);
            rollups.push(PlatformRollup {
                platform: sale.platform,
                rollup,
            });
        }
    }
    rollups
}

/// Platform with the most units sold.
///
/// Ties go to the platform declared first in [`Platform`], whatever order the sales arrive
/// in. `None` when there are no sales.
#[must_use]
pub fn most_popular_platform(sales: &[SaleModel]) -> Option<Platform> {
    platform_rollups(sales)
        .into_iter()
        .max_by(|a, b| {
            a.rollup
                .units
                .cmp(&b.rollup.units)
                .then_with(|| b.platform.cmp(&a.platform))
        })
        .map(|r| r.platform)
}

/// Rollup for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRollup {
    /// Product id, `None` for the bucket of sales whose product no longer exists
    pub product_id: Option<i64>,
    /// Display name at aggregation time
    pub name: String,
    /// Figures for the product
    pub rollup: Rollup,
}

/// Per-product rollups sorted by descending revenue (ties keep first-appearance order).
///
/// Sales that reference a missing product are pooled under one unknown-product entry.
#[must_use]
pub fn product_rollups(sales: &[SaleModel], products: &[ProductModel]) -> Vec<ProductRollup> {
    let mut index: HashMap<Option<i64>, usize> = HashMap::new();
    let mut rollups: Vec<ProductRollup> = Vec::new();

    for sale in sales {
        let key = store::find_product(products, sale.product_id).map(|p| p.id);
        let slot = *index.entry(key).or_insert_with(|| {
            rollups.push(ProductRollup {
                product_id: key,
                name: store::display_name(products, sale.product_id),
                rollup: Rollup::default(),
            });
            rollups.len() - 1
        });
        rollups[slot].rollup.add(sale);
    }

    rollups.sort_by(|a, b| b.rollup.revenue.cmp(&a.rollup.revenue));
    rollups
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    /// Σ sale price × quantity within the month
    pub revenue: i64,
}

/// Revenue per month of `sale_date`, ascending by month.
#[must_use]
pub fn monthly_revenue(sales: &[SaleModel]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for sale in sales {
        let key = (sale.sale_date.year(), sale.sale_date.month());
        *months.entry(key).or_default() += sale.revenue();
    }

    months
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            month: format!("{year}-{month:02}"),
            revenue,
        })
        .collect()
}

/// Stock figures across all products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Σ units in stock
    pub total_units: i64,
    /// Products with fewer than [`LOW_STOCK_THRESHOLD`] units
    pub low_stock_count: usize,
    /// Σ purchase price × stock
    pub stock_value: i64,
}

/// Computes stock figures for `products`.
#[must_use]
pub fn inventory_summary(products: &[ProductModel]) -> InventorySummary {
    InventorySummary {
        total_units: products.iter().map(|p| p.stock_quantity).sum(),
        low_stock_count: products
            .iter()
            .filter(|p| p.stock_quantity < LOW_STOCK_THRESHOLD)
            .count(),
        stock_value: products
            .iter()
            .map(|p| p.purchase_price.saturating_mul(p.stock_quantity))
            .sum(),
    }
}
