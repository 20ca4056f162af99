use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::config::Category;
use crate::models::flows::{ErrorResponse, FlowsQuery, FlowsResponse, UpdateResponse};
use crate::services::flow_query::{DEFAULT_DAYS, MAX_DAYS};
use crate::services::flow_update::run_update;
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

pub async fn get_flows(
    State(state): State<AppState>,
    Path(crypto_type): Path<String>,
    Query(query): Query<FlowsQuery>,
) -> Result<Json<FlowsResponse>, ApiError> {
    let category = Category::parse(&crypto_type)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Invalid crypto type"))?;

    let days = query.days.unwrap_or(DEFAULT_DAYS);
    if days == 0 || days > MAX_DAYS {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("days must be between 1 and {}", MAX_DAYS),
        ));
    }

    let response = state
        .flows_cache
        .get_or_load(&state.db, &state.universe, category, days)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load {} flows: {}", category, e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?;

    Ok(Json(response))
}

/// Rebuild all stored ETF flows from upstream history.
pub async fn update_flows(
    State(state): State<AppState>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let result = run_update(&state.db, state.market_data.as_ref(), &state.universe).await;

    // The table changed whether or not the run finished
    state.flows_cache.invalidate_all();

    let summary = result.map_err(|e| {
        tracing::error!("ETF flows update failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(UpdateResponse {
        status: "success".to_string(),
        tickers_updated: summary.tickers_updated,
        failed_tickers: summary.failed_tickers,
        records_written: summary.records_written,
    }))
}
