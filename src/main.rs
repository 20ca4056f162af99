use std::sync::Arc;

use etf_flows_backend::config::Config;
use etf_flows_backend::routes::build_router;
use etf_flows_backend::services::flow_query::FlowsCache;
use etf_flows_backend::services::market_data::YahooFinanceService;
use etf_flows_backend::AppState;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,etf_flows_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

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

    let yahoo = YahooFinanceService::new(config.yahoo_base_url.clone())
        .expect("Failed to build Yahoo Finance client");

    let state = AppState {
        db,
        market_data: Arc::new(yahoo),
        universe: Arc::new(config.universe.clone()),
        flows_cache: FlowsCache::new(config.flows_cache_ttl_secs),
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| config.bind_addr.clone())
    );

    axum::serve(listener, app).await.expect("Server error");
}
