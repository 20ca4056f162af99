use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::flows::{get_flows, update_flows};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello_etf_flows))
        .route("/api/flows/{crypto_type}", get(get_flows))
        .route("/api/update", get(update_flows))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello_etf_flows() -> &'static str {
    "ETF flows backend"
}
