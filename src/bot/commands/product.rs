//! Product Discord commands - `product` and `stock`.
//!
//! This module contains commands for maintaining the product catalog and the stock level
//! of each product.

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
            product::{self, ProductInput},
            report::format_forint,
            stats::{self, LOW_STOCK_THRESHOLD},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Discord's limit on embed description length.
    const EMBED_DESCRIPTION_LIMIT: usize = 4096;

    /// Parent command for managing the product catalog.
    #[poise::command(
        slash_command,
        subcommands("product_add", "product_list", "product_delete"),
        check = "crate::bot::require_session"
    )]
    pub async fn product(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Product management command. Available subcommands:\n\
            `/product add` - Add a new product\n\
            `/product list` - List all products\n\
            `/product delete` - Delete a product without sales";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a product to the catalog.
    ///
    /// Negative prices or stock are stored as 0.
    #[poise::command(
        slash_command,
        rename = "add",
        check = "crate::bot::require_session"
    )]
    pub async fn product_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name (e.g., 'AirPods Pro 2. generáció')"] name: String,
        #[description = "Model designation (e.g., 'AirPods Pro 2')"] model: String,
        #[description = "Purchase price per unit in forints"] purchase_price: i64,
        #[description = "Initial stock. Defaults to 0."] stock: Option<i64>,
    ) -> Result<()> {
        let input = ProductInput {
            name,
            model,
            purchase_price: purchase_price.to_string(),
            stock_quantity: stock.unwrap_or(0).to_string(),
        };

        match product::record_product(&ctx.data().database, input).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Product **{}** added (#{}) at {} with {} in stock.",
                    created.display_name(),
                    created.id,
                    format_forint(created.purchase_price),
                    created.stock_quantity
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_raise(ctx, e).await,
        }
    }

    /// Lists all products with purchase price and stock.
    #[poise::command(
        slash_command,
        rename = "list",
        check = "crate::bot::require_session"
    )]
    pub async fn product_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let products = product::list_products(&ctx.data().database).await?;

        if products.is_empty() {
            ctx.say("No products yet. Use `/product add` to create one!")
                .await?;
            return Ok(());
        }

        let mut description = String::new();
        for prod in &products {
            let marker = if prod.stock_quantity < LOW_STOCK_THRESHOLD {
                "⚠️ "
            } else {
                ""
            };
            let line = format!(
                "{marker}`#{}` **{}** - {} • {} db\n",
                prod.id,
                prod.display_name(),
                format_forint(prod.purchase_price),
                prod.stock_quantity
            );
            if description.len() + line.len() > EMBED_DESCRIPTION_LIMIT {
                break;
            }
            description.push_str(&line);
        }

        let inventory = stats::inventory_summary(&products);
        let list_embed = serenity::CreateEmbed::default()
            .title("**Product List**")
            .description(description)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} product(s) • {} db in stock worth {} • ⚠️ {} below {LOW_STOCK_THRESHOLD} db",
                products.len(),
                inventory.total_units,
                format_forint(inventory.stock_value),
                inventory.low_stock_count
            )))
            .color(0x0058_65F2); // Discord purple

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Deletes a product. Products with recorded sales cannot be deleted.
    #[poise::command(
        slash_command,
        rename = "delete",
        check = "crate::bot::require_session"
    )]
    pub async fn product_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to delete"]
        #[autocomplete = "autocomplete::autocomplete_product"]
        product: String,
    ) -> Result<()> {
        let outcome = match parse::require_product_ref(&product) {
            Ok(product_id) => product::delete_product(&ctx.data().database, product_id).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(deleted) => {
                ctx.say(format!(
                    "🗑️ Product **{}** (#{}) deleted.",
                    deleted.display_name(),
                    deleted.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_raise(ctx, e).await,
        }
    }

    /// Parent command for adjusting stock levels.
    #[poise::command(
        slash_command,
        subcommands("stock_set", "stock_add"),
        check = "crate::bot::require_session"
    )]
    pub async fn stock(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Stock command. Available subcommands:\n\
            `/stock set` - Set a product's stock to an exact number\n\
            `/stock add` - Add units to a product's stock";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets a product's stock to an exact number.
    #[poise::command(
        slash_command,
        rename = "set",
        check = "crate::bot::require_session"
    )]
    pub async fn stock_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to update"]
        #[autocomplete = "autocomplete::autocomplete_product"]
        product: String,
        #[description = "New stock level"] quantity: i64,
    ) -> Result<()> {
        let outcome = match parse::require_product_ref(&product) {
            Ok(product_id) => {
                product::set_stock(&ctx.data().database, product_id, quantity).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(updated) => {
                ctx.say(format!(
                    "📦 Stock of **{}** set to **{}**.",
                    updated.display_name(),
                    updated.stock_quantity
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_raise(ctx, e).await,
        }
    }

    /// Adds units to a product's stock.
    #[poise::command(
        slash_command,
        rename = "add",
        check = "crate::bot::require_session"
    )]
    pub async fn stock_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to restock"]
        #[autocomplete = "autocomplete::autocomplete_product"]
        product: String,
        #[description = "Units to add. Defaults to 1."] amount: Option<i64>,
    ) -> Result<()> {
        let amount = amount.unwrap_or(1);
        let outcome = match parse::require_product_ref(&product) {
            Ok(product_id) => product::add_stock(&ctx.data().database, product_id, amount).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(updated) => {
                ctx.say(format!(
                    "📦 Added {amount} to **{}**. Stock is now **{}**.",
                    updated.display_name(),
                    updated.stock_quantity
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_raise(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
