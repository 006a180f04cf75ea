use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wholesale_sync::clients::{SendcloudClient, SnelstartClient};
use wholesale_sync::config::AppConfig;
use wholesale_sync::services::reference_cache;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wholesale_sync=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("Missing required environment variables");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let snelstart = SnelstartClient::new(&config);
    let sendcloud = SendcloudClient::new(&config);
    let mut failed = false;

    match reference_cache::refresh_tax_rates(&db, &snelstart).await {
        Ok(counts) => println!(
            "Tax rates: {} created, {} updated, {} deleted",
            counts.created, counts.updated, counts.deleted
        ),
        Err(e) => {
            eprintln!("Failed to refresh tax rates: {}", e);
            failed = true;
        }
    }

    match reference_cache::refresh_ledger_accounts(&db, &snelstart).await {
        Ok(counts) => println!(
            "Ledger accounts: {} created, {} updated, {} deleted",
            counts.created, counts.updated, counts.deleted
        ),
        Err(e) => {
            eprintln!("Failed to refresh ledger accounts: {}", e);
            failed = true;
        }
    }

    match reference_cache::refresh_countries(&db, &snelstart).await {
        Ok(counts) => println!(
            "Countries: {} created, {} updated, {} deleted",
            counts.created, counts.updated, counts.deleted
        ),
        Err(e) => {
            eprintln!("Failed to refresh countries: {}", e);
            failed = true;
        }
    }

    match reference_cache::refresh_shipping_methods(&db, &sendcloud).await {
        Ok(counts) => println!(
            "Shipping methods: {} created, {} updated, {} deleted",
            counts.created, counts.updated, counts.deleted
        ),
        Err(e) => {
            eprintln!("Failed to refresh shipping methods: {}", e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
