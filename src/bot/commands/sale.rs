//! Sale Discord commands - `sale` and `sales`.
//!
//! Recording a sale decrements stock in the same database transaction, so the reply always
//! shows the stock that is actually left.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, parse},
            reply_or_raise,
        },
        core::{
            product,
            report::{format_forint, format_sale_date},
            sale::{self, SaleInput},
            store,
        },
        entities::Platform,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Default number of sales shown by `/sales`.
    const DEFAULT_RECENT_SALES: u8 = 10;
    /// Upper bound for `/sales`.
    const MAX_RECENT_SALES: u8 = 25;

    /// Platform options offered in the `/sale` command.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PlatformChoice {
        Webshop,
        Facebook,
        Instagram,
        Marketplace,
        #[name = "Egyéb"]
        Other,
    }

    impl From<PlatformChoice> for Platform {
        fn from(choice: PlatformChoice) -> Self {
            match choice {
                PlatformChoice::Webshop => Self::Webshop,
                PlatformChoice::Facebook => Self::Facebook,
                PlatformChoice::Instagram => Self::Instagram,
                PlatformChoice::Marketplace => Self::Marketplace,
                PlatformChoice::Other => Self::Other,
            }
        }
    }

    /// Records a sale and takes the sold units out of stock.
    ///
    /// The sale price defaults to the purchase price plus 30%, the cost to the purchase
    /// price and the date to today.
    #[poise::command(slash_command, check = "crate::bot::require_session")]
    pub async fn sale(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product sold"]
        #[autocomplete = "autocomplete::autocomplete_product"]
        product: String,
        #[description = "Units sold"] quantity: i64,
        #[description = "Where the sale happened"] platform: PlatformChoice,
        #[description = "Sale price per unit. Defaults to purchase price + 30%."]
        sale_price: Option<i64>,
        #[description = "Cost per unit. Defaults to the purchase price."] cost_price: Option<
            i64,
        >,
        #[description = "Sale date as YYYY-MM-DD. Defaults to today."] date: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let today = sale::business_day(chrono::Utc::now(), ctx.data().business_offset);

        let input = match prepare_sale(
            db,
            today,
            &product,
            quantity,
            platform.into(),
            sale_price,
            cost_price,
            date.as_deref(),
        )
        .await
        {
            Ok(input) => input,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        let recorded = match sale::record_sale(db, input).await {
            Ok(recorded) => recorded,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        let sold = &recorded.sale;
        let embed = serenity::CreateEmbed::default()
            .title("✅ Sale recorded")
            .description(format!(
                "**{}** × {} on {}",
                recorded.product.display_name(),
                sold.quantity,
                sold.platform
            ))
            .field("Date", format_sale_date(sold.sale_date), true)
            .field("Revenue", format_forint(sold.revenue()), true)
            .field("Profit", format_forint(sold.profit()), true)
            .field(
                "Stock left",
                recorded.product.stock_quantity.to_string(),
                true,
            )
            .color(0x0057_F287); // Discord green

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Resolves the command arguments into a [`SaleInput`].
    #[allow(clippy::too_many_arguments)]
    async fn prepare_sale(
        db: &sea_orm::DatabaseConnection,
        today: chrono::NaiveDate,
        product_ref: &str,
        quantity: i64,
        platform: Platform,
        sale_price: Option<i64>,
        cost_price: Option<i64>,
        date: Option<&str>,
    ) -> Result<SaleInput> {
        let product_id = parse::require_product_ref(product_ref)?;
        let sale_date = parse::parse_day("date", date)?
            .unwrap_or(today);

        let sale_price = match sale_price {
            Some(price) => price,
            None => {
                let product = product::get_product_by_id(db, product_id)
                    .await?
                    .ok_or(Error::ProductNotFound { id: product_id })?;
                sale::suggested_sale_price(product.purchase_price)
            }
        };

        Ok(SaleInput {
            product_id,
            quantity,
            sale_price,
            cost_price,
            platform,
            sale_date,
        })
    }

    /// Shows the most recent sales.
    #[poise::command(slash_command, check = "crate::bot::require_session")]
    pub async fn sales(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many sales to show (1-25). Defaults to 10."] limit: Option<u8>,
    ) -> Result<()> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_SALES)
            .clamp(1, MAX_RECENT_SALES);
        let db = &ctx.data().database;

        let recent = sale::list_recent_sales(db, u64::from(limit)).await?;
        if recent.is_empty() {
            ctx.say("No sales recorded yet. Use `/sale` to record one!")
                .await?;
            return Ok(());
        }
        let products = product::list_products(db).await?;

        let embed_fields: Vec<(String, String, bool)> = recent
            .iter()
            .map(|s| {
                (
                    format!(
                        "{} • {}",
                        format_sale_date(s.sale_date),
                        store::display_name(&products, s.product_id)
                    ),
                    format!(
                        "{} db × {} on {} • profit {}",
                        s.quantity,
                        format_forint(s.sale_price),
                        s.platform,
                        format_forint(s.profit())
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("**Last {} sale(s)**", recent.len()))
            .fields(embed_fields)
            .color(0x0058_65F2); // Discord purple

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
