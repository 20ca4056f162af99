//! Daily price/volume history for ETF tickers.
//!
//! `MarketDataSource` is the seam the update job talks to; `YahooFinanceService`
//! is the production implementation backed by Yahoo's v8 chart API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no history returned for {0}")]
    EmptySeries(String),
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Full daily history for `symbol`, oldest first.
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Clone)]
pub struct YahooFinanceService {
    client: Client,
    base_url: String,
}

impl YahooFinanceService {
    pub fn new(base_url: String) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceService {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        tracing::debug!("Fetching max daily history for {} from Yahoo", symbol);

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[("range", "max"), ("interval", "1d"), ("events", "history")])
            .send()
            .await?;

        // Yahoo reports unknown symbols as 404 with a chart error body
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() && status.as_u16() != 404 {
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChartResponse = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        let bars = parse_chart(symbol, parsed)?;

        tracing::debug!("Fetched {} daily bars for {}", bars.len(), symbol);

        Ok(bars)
    }
}

fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyBar>, MarketDataError> {
    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                }
                Some(err) => MarketDataError::Malformed(format!("{}: {}", err.code, err.description)),
                None => MarketDataError::Malformed("empty result with no error".into()),
            });
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::Malformed("result array is empty".into()))?;

    let gmtoffset = data.meta.map(|m| m.gmtoffset).unwrap_or(0);

    // Listed but never traded: no timestamps at all
    let timestamps = data
        .timestamp
        .ok_or_else(|| MarketDataError::EmptySeries(symbol.to_string()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::Malformed("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        let (Some(close), Some(volume)) = (close, volume) else {
            continue;
        };

        let date = DateTime::from_timestamp(ts + gmtoffset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| MarketDataError::Malformed(format!("invalid timestamp: {}", ts)))?;

        bars.push(DailyBar { date, close, volume });
    }

    if bars.is_empty() {
        return Err(MarketDataError::EmptySeries(symbol.to_string()));
    }

    bars.sort_by_key(|bar| bar.date);

    Ok(bars)
}
