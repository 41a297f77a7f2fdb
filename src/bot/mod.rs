//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the ledger: slash commands, autocomplete
//! handlers, the shared bot context, and the framework setup.

/// Discord command implementations (auth, product, sale, report, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, argument parsing)
pub mod handlers;

use crate::{
    core::auth::{Credentials, SessionStore},
    errors::{Error, Result},
};
use chrono::FixedOffset;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all ledger operations
    pub database: DatabaseConnection,
    /// The operator's credential pair
    pub credentials: Credentials,
    /// Open sessions, keyed by Discord user id
    pub sessions: Mutex<SessionStore>,
    /// Shop offset from UTC, used to pick today's business day
    pub business_offset: FixedOffset,
}

impl BotData {
    /// Creates the bot context with an empty session table.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        credentials: Credentials,
        session_hours: i64,
        business_offset: FixedOffset,
    ) -> Self {
        Self {
            database,
            credentials,
            sessions: Mutex::new(SessionStore::new(session_hours)),
            business_offset,
        }
    }
}

/// Command check that requires a live session for the invoking user.
pub async fn require_session(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let user_id = ctx.author().id.to_string();
    ctx.data().sessions.lock().await.require(&user_id)?;
    Ok(true)
}

/// Answers user-facing errors inline and hands everything else back to the framework.
pub async fn reply_or_raise(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
    if error.is_user_facing() {
        warn!(command = %ctx.command().name, "{error}");
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let message = error.map_or_else(
                || "🔒 You are not allowed to use this command.".to_string(),
                |e| format!("🔒 {e}"),
            );
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send check failure message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::health(),
                commands::login(),
                commands::logout(),
                commands::product(),
                commands::stock(),
                commands::sale(),
                commands::sales(),
                commands::stats(),
                commands::report(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
