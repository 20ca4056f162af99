// src/lib.rs

use std::sync::Arc;

use config::EtfUniverse;
use sea_orm::DatabaseConnection;
use services::{flow_query::FlowsCache, market_data::MarketDataSource};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub market_data: Arc<dyn MarketDataSource>,
    pub universe: Arc<EtfUniverse>,
    pub flows_cache: FlowsCache,
}

pub mod entities {
    pub mod prelude;
    pub mod etf_flows;
}

pub mod services {
    pub mod market_data;
    pub mod flow_store;
    pub mod flow_update;
    pub mod flow_query;
}

pub mod config;
pub mod models;
pub mod handlers;
pub mod routes;
