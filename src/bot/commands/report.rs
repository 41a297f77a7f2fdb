//! Reporting Discord commands - `stats` and `report`.
//!
//! Both commands load a fresh [`LedgerSnapshot`](crate::core::store::LedgerSnapshot) so the
//! figures always reflect the latest writes.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::parse, reply_or_raise},
        core::{
            report::{self, SalesReport, format_forint, format_percent},
            stats::{self, DateRange, LOW_STOCK_THRESHOLD, LedgerSummary},
            sale,
            store::LedgerSnapshot,
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Products listed in the top-products section.
    const TOP_PRODUCTS: usize = 5;
    /// Months listed in the monthly revenue section.
    const RECENT_MONTHS: usize = 6;

    fn summary_fields(summary: &LedgerSummary) -> Vec<(String, String, bool)> {
        #[allow(clippy::cast_possible_truncation)]
        let average_price = summary.average_sale_price.round() as i64;

        vec![
            (
                "Revenue".to_string(),
                format_forint(summary.total_revenue),
                true,
            ),
            ("Cost".to_string(), format_forint(summary.total_cost), true),
            (
                "Profit".to_string(),
                format!(
                    "{} ({})",
                    format_forint(summary.total_profit),
                    format_percent(summary.profit_percentage)
                ),
                true,
            ),
            (
                "Units sold".to_string(),
                format!("{} in {} sale(s)", summary.total_units, summary.total_sales),
                true,
            ),
            (
                "Average price".to_string(),
                format_forint(average_price),
                true,
            ),
            (
                "Top platform".to_string(),
                summary
                    .most_popular_platform
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
                true,
            ),
        ]
    }

    fn platform_lines(report: &SalesReport) -> String {
        let mut text = String::new();
        for entry in &report.platforms {
            let _ = writeln!(
                text,
                "**{}**: {} db • {} • profit {}",
                entry.platform,
                entry.rollup.units,
                format_forint(entry.rollup.revenue),
                format_forint(entry.rollup.profit)
            );
        }
        text
    }

    fn product_lines(report: &SalesReport) -> String {
        let mut text = String::new();
        for (rank, entry) in report.products.iter().take(TOP_PRODUCTS).enumerate() {
            let _ = writeln!(
                text,
                "{}. **{}**: {} db • {} ({})",
                rank + 1,
                entry.name,
                entry.rollup.units,
                format_forint(entry.rollup.revenue),
                format_percent(entry.rollup.margin_percent())
            );
        }
        text
    }

    fn or_placeholder(text: String) -> String {
        if text.is_empty() {
            "No sales in this period.".to_string()
        } else {
            text
        }
    }

    /// Shows all-time figures: totals, platforms, top products, monthly revenue and stock.
    #[poise::command(slash_command, check = "crate::bot::require_session")]
    pub async fn stats(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let snapshot = LedgerSnapshot::load(&ctx.data().database).await?;
        let report = report::build_report(&snapshot, DateRange::default(), Utc::now());

        let months = stats::monthly_revenue(&report.sales);
        let mut month_text = String::new();
        for month in months.iter().rev().take(RECENT_MONTHS).rev() {
            let _ = writeln!(month_text, "`{}` {}", month.month, format_forint(month.revenue));
        }

        let inventory = stats::inventory_summary(&snapshot.products);
        let inventory_text = format!(
            "{} db in stock • value {}\n{} product(s) below {LOW_STOCK_THRESHOLD} db",
            inventory.total_units,
            format_forint(inventory.stock_value),
            inventory.low_stock_count
        );

        let embed = serenity::CreateEmbed::default()
            .title("📊 **Sales Statistics**")
            .fields(summary_fields(&report.summary))
            .field("By platform", or_placeholder(platform_lines(&report)), false)
            .field("Top products", or_placeholder(product_lines(&report)), false)
            .field("Monthly revenue", or_placeholder(month_text), false)
            .field("Inventory", inventory_text, false)
            .color(0x0058_65F2); // Discord purple

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Summarizes sales in a date range and attaches them as a CSV file.
    #[poise::command(slash_command, check = "crate::bot::require_session")]
    pub async fn report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First day as YYYY-MM-DD. Defaults to the beginning."] start: Option<
            String,
        >,
        #[description = "Last day as YYYY-MM-DD. Defaults to today."] end: Option<String>,
    ) -> Result<()> {
        let range = match parse::parse_day("start", start.as_deref())
            .and_then(|s| parse::parse_day("end", end.as_deref()).map(|e| (s, e)))
        {
            Ok((start, end)) => DateRange::from_days(start, end),
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        let now = Utc::now();
        let snapshot = LedgerSnapshot::load(&ctx.data().database).await?;
        let sales_report = report::build_report(&snapshot, range, now);
        let csv = report::export_csv(&sales_report.sales, &snapshot.products)?;
        let today = sale::business_day(now, ctx.data().business_offset);
        let file_name = report::export_file_name(today);

        info!(
            sales = sales_report.sales.len(),
            file_name, "Sales report exported"
        );

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "🧾 **Sales Report** ({})",
                report::describe_range(&sales_report.range)
            ))
            .fields(summary_fields(&sales_report.summary))
            .field(
                "By platform",
                or_placeholder(platform_lines(&sales_report)),
                false,
            )
            .field(
                "Top products",
                or_placeholder(product_lines(&sales_report)),
                false,
            )
            .color(0x00FE_E75C); // Discord yellow

        let attachment = serenity::CreateAttachment::bytes(csv.into_bytes(), file_name);
        ctx.send(
            poise::CreateReply::default()
                .embed(embed)
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
