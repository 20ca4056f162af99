use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfFlowSeries {
    pub ticker: String,
    pub daily_flows: Vec<f64>,
    pub cumulative_flows: Vec<f64>,
    pub aum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTotals {
    pub daily: Vec<f64>,
    pub cumulative: Vec<f64>,
    pub total_aum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowsResponse {
    pub dates: Vec<String>, // YYYY-MM-DD, oldest first
    pub etfs: Vec<EtfFlowSeries>,
    pub totals: FlowTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub tickers_updated: usize,
    pub failed_tickers: Vec<String>,
    pub records_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
