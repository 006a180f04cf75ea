use std::env;
use std::time::Duration;

use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wholesale_sync::clients::{SnelstartClient, SourceApi, UphanceClient};
use wholesale_sync::config::AppConfig;
use wholesale_sync::entities::mutations::Trigger;
use wholesale_sync::services::{customers, SyncOutcome};

fn parse_args(args: &[String]) -> Option<u64> {
    let mut sleep_secs = 0u64;
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--sleep" {
            sleep_secs = args.get(i + 1)?.parse().ok()?;
            i += 2;
        } else {
            return None;
        }
    }
    Some(sleep_secs)
}

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

    let args: Vec<String> = env::args().collect();
    let Some(sleep_secs) = parse_args(&args) else {
        eprintln!("Usage: cargo run --bin synchronize_customers [--sleep <secs>]");
        std::process::exit(1);
    };

    let config = AppConfig::from_env().expect("Missing required environment variables");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let uphance = UphanceClient::new(&config);
    let snelstart = SnelstartClient::new(&config);

    let mut total = 0u32;
    let mut synced = 0u32;
    let mut page = Some(1u32);

    while let Some(current_page) = page {
        tracing::info!("Fetching customer page {}", current_page);
        let batch = match uphance.list_customers(current_page).await {
            Ok(batch) => batch,
            Err(e) => {
                eprintln!("Failed to retrieve customer page {}: {}", current_page, e);
                break;
            }
        };
        page = batch.next_page;

        for customer in &batch.objects {
            total += 1;
            match customers::try_synchronize_customer(&db, &snelstart, customer, Trigger::Manual)
                .await
            {
                Ok(SyncOutcome::Synchronized) => {
                    println!("Customer {}: synchronized", customer.id);
                    synced += 1;
                }
                Ok(SyncOutcome::Failed(message)) => {
                    println!("Customer {}: {}", customer.id, message)
                }
                Err(e) => eprintln!("Customer {}: database error: {}", customer.id, e),
            }

            if sleep_secs > 0 {
                tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
            }
        }
    }

    println!("Synchronized {}/{} customers", synced, total);
}
