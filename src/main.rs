use dotenvy::dotenv;
use resale_ledger::{
    bot::{self, BotData},
    config,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the seed catalog and the operator credentials
    let catalog = config::catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {e}"))?;
    let credentials = config::auth::load_credentials()
        .inspect_err(|e| error!("Operator credentials are not configured: {e}"))?;
    let session_hours = config::auth::session_hours();
    let business_offset = config::locale::business_offset()
        .inspect_err(|e| error!("Invalid shop time zone: {e}"))?;

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed the product catalog into an empty database
    config::catalog::seed_products(&db, &catalog)
        .await
        .inspect_err(|e| error!("Failed to seed products: {e}"))?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(db, credentials, session_hours, business_offset);
    bot::run_bot(token, data).await
}
