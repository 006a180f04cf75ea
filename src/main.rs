use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wholesale_sync::config::AppConfig;
use wholesale_sync::{router, AppState};

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

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let bind_address = config.bind_address.clone();
    let state = AppState::new(db, config);
    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Server listening on {}", bind_address);

    axum::serve(listener, app).await.expect("Server error");
}
