use std::env;
use std::time::Duration;

use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wholesale_sync::clients::{SnelstartClient, SourceApi, UphanceClient};
use wholesale_sync::config::AppConfig;
use wholesale_sync::entities::mutations::Trigger;
use wholesale_sync::services::{credit_notes, SyncOutcome};

#[derive(Copy, Clone)]
enum Operation {
    Create,
    Update,
    Delete,
}

fn parse_args(args: &[String]) -> Option<(Operation, i32, i32, u64)> {
    let mut positional = Vec::new();
    let mut sleep_secs = 0u64;
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--sleep" {
            sleep_secs = args.get(i + 1)?.parse().ok()?;
            i += 2;
        } else {
            positional.push(args[i].as_str());
            i += 1;
        }
    }

    let operation = match *positional.first()? {
        "create" => Operation::Create,
        "update" => Operation::Update,
        "delete" => Operation::Delete,
        _ => return None,
    };
    let start_id: i32 = positional.get(1)?.parse().ok()?;
    let end_id: i32 = match positional.get(2) {
        Some(raw) => raw.parse().ok()?,
        None => start_id,
    };
    if end_id < start_id {
        return None;
    }
    Some((operation, start_id, end_id, sleep_secs))
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
    let Some((operation, start_id, end_id, sleep_secs)) = parse_args(&args) else {
        eprintln!(
            "Usage: cargo run --bin synchronize_credit_note <create|update|delete> <id> [<end_id>] [--sleep <secs>]"
        );
        std::process::exit(1);
    };

    let config = AppConfig::from_env().expect("Missing required environment variables");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let uphance = UphanceClient::new(&config);
    let snelstart = SnelstartClient::new(&config);

    let total = end_id - start_id + 1;
    let mut synced = 0;

    for id in start_id..=end_id {
        let credit_note = match uphance.get_credit_note(id).await {
            Ok(credit_note) => credit_note,
            Err(e) => {
                eprintln!("Failed to retrieve credit note {}: {}", id, e);
                continue;
            }
        };

        let result = match operation {
            Operation::Create => {
                credit_notes::try_create_credit_note(
                    &db,
                    &uphance,
                    &snelstart,
                    &credit_note,
                    Trigger::Manual,
                )
                .await
            }
            Operation::Update => {
                credit_notes::try_update_credit_note(
                    &db,
                    &uphance,
                    &snelstart,
                    &credit_note,
                    Trigger::Manual,
                )
                .await
            }
            Operation::Delete => {
                credit_notes::try_delete_credit_note(&db, &snelstart, &credit_note, Trigger::Manual)
                    .await
            }
        };

        match result {
            Ok(SyncOutcome::Synchronized) => {
                println!("Credit note {}: synchronized", id);
                synced += 1;
            }
            Ok(SyncOutcome::Failed(message)) => println!("Credit note {}: {}", id, message),
            Err(e) => eprintln!("Credit note {}: database error: {}", id, e),
        }

        if sleep_secs > 0 && id != end_id {
            tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
        }
    }

    println!("Synchronized {}/{} credit notes", synced, total);
}
