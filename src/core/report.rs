//! Report generation and CSV export.
//!
//! This module turns a snapshot and a date window into a structured [`SalesReport`] and
//! serializes filtered sales to CSV. Formatting helpers for forint amounts and percentages
//! live here too so every surface renders money the same way.

use crate::{
    core::{
        stats::{self, DateRange, LedgerSummary, PlatformRollup, ProductRollup},
        store::{self, LedgerSnapshot},
    },
    entities::{ProductModel, SaleModel},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};

/// CSV header, in the ledger's display language.
pub const CSV_HEADER: [&str; 7] = [
    "Dátum",
    "Termék",
    "Mennyiség",
    "Eladási ár",
    "Költség",
    "Profit",
    "Platform",
];

/// Everything shown for one report window.
#[derive(Debug, Clone)]
pub struct SalesReport {
    /// Window the report covers
    pub range: DateRange,
    /// Sales inside the window, newest first
    pub sales: Vec<SaleModel>,
    /// Headline figures
    pub summary: LedgerSummary,
    /// Per-platform figures, first-occurrence order
    pub platforms: Vec<PlatformRollup>,
    /// Per-product figures, highest revenue first
    pub products: Vec<ProductRollup>,
}

/// Builds the report for `range` from `snapshot`, evaluating open ends at `now`.
#[must_use]
pub fn build_report(snapshot: &LedgerSnapshot, range: DateRange, now: DateTime<Utc>) -> SalesReport {
    let sales = range.filter(&snapshot.sales, now);
    SalesReport {
        range,
        summary: stats::summarize(&sales),
        platforms: stats::platform_rollups(&sales),
        products: stats::product_rollups(&sales, &snapshot.products),
        sales,
    }
}

/// Formats a sale date the Hungarian way: `2024. 03. 05.`
#[must_use]
pub fn format_sale_date(date: DateTime<Utc>) -> String {
    date.format("%Y. %m. %d.").to_string()
}

/// Serializes `sales` to CSV: one header row, then one row per sale with date, product,
/// quantity, revenue, cost, profit and platform.
///
/// Product names are resolved against `products`; dangling references print as
/// [`store::UNKNOWN_PRODUCT_LABEL`]. Fields containing the delimiter are quoted.
///
/// # Errors
/// Returns an error if the CSV writer fails.
pub fn export_csv(sales: &[SaleModel], products: &[ProductModel]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for sale in sales {
        writer.write_record([
            format_sale_date(sale.sale_date),
            store::display_name(products, sale.product_id),
            sale.quantity.to_string(),
            sale.revenue().to_string(),
            sale.cost().to_string(),
            sale.profit().to_string(),
            sale.platform.label().to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export made on `day`: `eladasok_2024-03-05.csv`.
#[must_use]
pub fn export_file_name(day: NaiveDate) -> String {
    format!("eladasok_{}.csv", day.format("%Y-%m-%d"))
}

/// Formats whole forints with space thousand separators, e.g. `-1 234 567 Ft`.
#[must_use]
pub fn format_forint(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{grouped} Ft")
    } else {
        format!("{grouped} Ft")
    }
}

/// Formats a percentage with one decimal, e.g. `25.0%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Describes a date range for headings, e.g. `2024. 03. 01. – 2024. 03. 31.`
#[must_use]
pub fn describe_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (None, None) => "All time".to_string(),
        (Some(start), None) => format!("From {}", format_sale_date(start)),
        (None, Some(end)) => format!("Until {}", format_sale_date(end)),
        (Some(start), Some(end)) => {
            format!("{} – {}", format_sale_date(start), format_sale_date(end))
        }
    }
}
