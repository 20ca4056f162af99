use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use etf_flows_backend::config::Config;
use etf_flows_backend::services::flow_update::run_update;
use etf_flows_backend::services::market_data::YahooFinanceService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
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

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let yahoo = YahooFinanceService::new(config.yahoo_base_url.clone())?;

    match run_update(&db, &yahoo, &config.universe).await {
        Ok(summary) => {
            tracing::info!(
                "Updated {} tickers ({} records)",
                summary.tickers_updated,
                summary.records_written
            );
            if !summary.failed_tickers.is_empty() {
                tracing::warn!("Skipped tickers: {}", summary.failed_tickers.join(", "));
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("ETF flows update failed: {}", e);
            Err(e.into())
        }
    }
}
