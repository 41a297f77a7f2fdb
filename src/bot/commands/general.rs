//! General Discord commands - ping, help and health.
//! These commands need no session and give basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        config::database,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Resale Ledger Help**\n\
        Log in first; every ledger command needs a live session.\n\n\
        **Session**\n\
        • `/login <email> <password>` - Opens a session for your account.\n\
        • `/logout` - Ends your session.\n\n\
        **Inventory**\n\
        • `/product add <name> <model> <purchase_price> [stock]` - Adds a product.\n\
        • `/product list` - Lists products with stock.\n\
        • `/product delete <product>` - Deletes a product that has no sales.\n\
        • `/stock set <product> <quantity>` - Sets a product's stock.\n\
        • `/stock add <product> [amount]` - Adds units to a product's stock.\n\n\
        **Sales**\n\
        • `/sale <product> <quantity> <platform> [sale_price] [cost_price] [date]` - Records a sale.\n\
        • `/sales [limit]` - Shows the most recent sales.\n\n\
        **Reporting**\n\
        • `/stats` - Shows totals, platforms, top products and stock.\n\
        • `/report [start] [end]` - Summarizes a date range and attaches a CSV export.\n\n\
        **Utility**\n\
        • `/health` - Checks the database connection.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Checks the database connection and reports the round-trip time.
    #[poise::command(slash_command, prefix_command)]
    pub async fn health(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let status = database::check_connection_health(&ctx.data().database).await;
        let icon = if status.healthy { "✅" } else { "❌" };
        ctx.say(format!("{icon} {}", status.message())).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
