//! Stockroom CLI - operate the inventory sync engine.

mod commands;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stockroom::config::Settings;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version)]
#[command(about = "Shopify inventory sync engine")]
#[command(
    long_about = "Stockroom ingests Shopify shop data (locations, products, variants, \
inventory, orders) into a normalized datastore for demand forecasting. This CLI runs \
migrations, the background worker, and manual sync operations."
)]
#[command(after_long_help = r#"EXAMPLES
    Apply migrations:
        $ stockroom migrate up

    Run the background worker:
        $ stockroom worker

    Trigger a sync for a connected shop:
        $ stockroom sync trigger usr_c8v4hk2m3n5p7q9r0s1t demo.myshopify.com

    Check sync status:
        $ stockroom sync status usr_c8v4hk2m3n5p7q9r0s1t demo.myshopify.com

ENVIRONMENT VARIABLES
    DATABASE_URL             Relational database DSN (required)
    REDIS_URL                Queue broker address (default redis://127.0.0.1:6379)
    SECRET_KEY               32-byte key for credential encryption (required)
    SHOPIFY_CLIENT_ID        Shopify OAuth client id
    SHOPIFY_CLIENT_SECRET    Shopify OAuth client secret
    SHOPIFY_REDIRECT_URL     Shopify OAuth redirect URL
    SHOPIFY_SCOPES           Comma-separated scopes
    LOG_LEVEL                debug|info|warn|error (default info)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Run the background sync worker
    Worker,
    /// Trigger or inspect syncs
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and reapply migrations
    Fresh,
}

#[derive(Subcommand)]
enum SyncAction {
    /// Trigger a full sync for a (user, shop) pair
    Trigger {
        /// User id (usr_...)
        user_id: String,
        /// Shop domain; scheme and missing .myshopify.com suffix are fixed up
        shop_domain: String,
        /// Bypass the dedup gate and cooldown
        #[arg(short, long)]
        force: bool,
    },
    /// Show the current sync status for a (user, shop) pair
    Status {
        /// User id (usr_...)
        user_id: String,
        /// Shop domain
        shop_domain: String,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load()?;
    init_tracing(&settings.log_level);

    match cli.command {
        Commands::Migrate { action } => commands::migrate::run(&settings, action).await,
        Commands::Worker => commands::worker::run(&settings).await,
        Commands::Sync { action } => commands::sync::run(&settings, action).await,
    }
}
