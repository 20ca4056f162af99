use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use thiserror::Error;

use crate::config::{Category, EtfUniverse};
use crate::services::flow_store::{self, FlowValues};
use crate::services::market_data::{DailyBar, MarketDataSource};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to clear etf_flows: {0}")]
    Truncate(#[source] DbErr),

    #[error("database error while storing {ticker}: {source}")]
    Store {
        ticker: String,
        #[source]
        source: DbErr,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    pub tickers_updated: usize,
    pub failed_tickers: Vec<String>,
    pub records_written: usize,
}

/// Dollar volume in millions.
pub fn compute_flow(close: f64, volume: f64) -> f64 {
    volume * close / 1_000_000.0
}

/// Rebuild the whole `etf_flows` table from upstream history.
///
/// A ticker whose history cannot be fetched is skipped. Any database error
/// aborts the run; the ticker being written at that point is rolled back.
pub async fn run_update(
    db: &DatabaseConnection,
    source: &dyn MarketDataSource,
    universe: &EtfUniverse,
) -> Result<UpdateSummary, UpdateError> {
    tracing::info!("Starting ETF flows update for {} tickers", universe.len());

    flow_store::truncate(db).await.map_err(UpdateError::Truncate)?;

    let mut summary = UpdateSummary::default();

    for (category, ticker) in universe.iter() {
        let mut bars = match source.fetch_history(ticker).await {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!("Error processing {}: {}", ticker, e);
                summary.failed_tickers.push(ticker.to_string());
                continue;
            }
        };

        // Stable, so repeated dates keep their upstream order
        bars.sort_by_key(|bar| bar.date);

        let written = store_ticker_history(db, category, ticker, &bars)
            .await
            .map_err(|e| {
                tracing::error!("Database error while storing {}: {}", ticker, e);
                UpdateError::Store {
                    ticker: ticker.to_string(),
                    source: e,
                }
            })?;

        tracing::info!("Stored {} flow records for {} ({})", written, ticker, category);

        summary.tickers_updated += 1;
        summary.records_written += written;
    }

    tracing::info!(
        "ETF flows update complete: {} tickers, {} records, {} failed {:?}",
        summary.tickers_updated,
        summary.records_written,
        summary.failed_tickers.len(),
        summary.failed_tickers
    );

    Ok(summary)
}

/// Write one ticker's history in a single transaction.
/// Returns the number of newly inserted rows.
async fn store_ticker_history(
    db: &DatabaseConnection,
    category: Category,
    ticker: &str,
    bars: &[DailyBar],
) -> Result<usize, DbErr> {
    let txn = db.begin().await?;
    let mut inserted = 0;

    for bar in bars {
        let daily_flow = compute_flow(bar.close, bar.volume);

        let prev_cumulative = flow_store::find_previous(&txn, ticker, bar.date)
            .await?
            .map(|prev| prev.cumulative_flow)
            .unwrap_or(0.0);

        let values = FlowValues {
            daily_flow,
            cumulative_flow: prev_cumulative + daily_flow,
            aum: compute_flow(bar.close, bar.volume),
        };

        if flow_store::upsert_flow(&txn, category, ticker, bar.date, values).await? {
            inserted += 1;
        }
    }

    // Dropping `txn` on an early return above rolls it back
    txn.commit().await?;

    Ok(inserted)
}
