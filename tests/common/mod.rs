#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use etf_flows_backend::config::EtfUniverse;
use etf_flows_backend::services::flow_query::FlowsCache;
use etf_flows_backend::services::market_data::{DailyBar, MarketDataError, MarketDataSource};
use etf_flows_backend::AppState;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

/// Set up a fresh in-memory database with the schema applied.
/// A single pooled connection keeps every query on the same SQLite memory db.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// In-memory market data keyed by ticker. Unknown tickers and tickers in
/// `failing` return an error.
#[derive(Default)]
pub struct StaticMarketData {
    histories: HashMap<String, Vec<DailyBar>>,
    failing: HashSet<String>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, ticker: &str, bars: Vec<DailyBar>) -> Self {
        self.histories.insert(ticker.to_string(), bars);
        self
    }

    pub fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        if self.failing.contains(symbol) {
            return Err(MarketDataError::Status {
                status: 503,
                body: "injected failure".to_string(),
            });
        }

        self.histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bar(date: NaiveDate, close: f64, volume: f64) -> DailyBar {
    DailyBar { date, close, volume }
}

pub fn universe(btc: &[&str], eth: &[&str]) -> EtfUniverse {
    let owned = |list: &[&str]| list.iter().map(|t| t.to_string()).collect();
    EtfUniverse::new(owned(btc), owned(eth))
}

pub fn app_state(
    db: DatabaseConnection,
    source: StaticMarketData,
    universe: EtfUniverse,
) -> AppState {
    AppState {
        db,
        market_data: Arc::new(source),
        universe: Arc::new(universe),
        flows_cache: FlowsCache::disabled(),
    }
}

/// Issue a GET against the router and decode the JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}
