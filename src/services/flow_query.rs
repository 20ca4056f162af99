//! Dense per-ticker flow series over a rolling business-day window.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use moka::future::Cache;
use sea_orm::{DatabaseConnection, DbErr};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Category, EtfUniverse};
use crate::models::flows::{EtfFlowSeries, FlowTotals, FlowsResponse};
use crate::services::flow_store;

pub const DEFAULT_DAYS: u32 = 14;
/// Largest window served, roughly 380 years of weekdays.
pub const MAX_DAYS: u32 = 100_000;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The `n` most recent weekdays on or before `end`, oldest first.
/// No holiday calendar. Stops early at the start of the supported date range.
pub fn business_days_ending(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n.min(MAX_DAYS as usize));
    let mut current = Some(end);

    while let Some(date) = current {
        if dates.len() >= n {
            break;
        }
        if is_business_day(date) {
            dates.push(date);
        }
        current = date.pred_opt();
    }

    dates.reverse();
    dates
}

pub fn recent_business_days(n: usize) -> Vec<NaiveDate> {
    business_days_ending(Utc::now().date_naive(), n)
}

/// Flows for every ticker of `category` over the `days` most recent business days.
pub async fn get_flows(
    db: &DatabaseConnection,
    universe: &EtfUniverse,
    category: Category,
    days: u32,
) -> Result<FlowsResponse, DbErr> {
    let dates = recent_business_days(days as usize);
    get_flows_for_dates(db, universe, category, &dates).await
}

pub async fn get_flows_for_dates(
    db: &DatabaseConnection,
    universe: &EtfUniverse,
    category: Category,
    dates: &[NaiveDate],
) -> Result<FlowsResponse, DbErr> {
    let tickers = universe.tickers(category);
    let records = match (dates.first(), dates.last()) {
        (Some(&first), Some(&last)) => {
            flow_store::find_in_window(db, tickers, first, last).await?
        }
        _ => Vec::new(),
    };

    tracing::debug!(
        "Loaded {} {} flow records across {} business days",
        records.len(),
        category,
        dates.len()
    );

    let date_index: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut etfs: Vec<EtfFlowSeries> = tickers
        .iter()
        .map(|ticker| EtfFlowSeries {
            ticker: ticker.clone(),
            daily_flows: vec![0.0; dates.len()],
            cumulative_flows: vec![0.0; dates.len()],
            aum: 0.0,
        })
        .collect();

    let ticker_index: HashMap<&str, usize> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    // Records arrive oldest first, so the last one seen per ticker carries the current AUM
    for record in records {
        let (Some(&row), Some(&col)) = (
            ticker_index.get(record.ticker.as_str()),
            date_index.get(&record.date),
        ) else {
            continue;
        };

        let series = &mut etfs[row];
        series.daily_flows[col] = record.daily_flow;
        series.cumulative_flows[col] = record.cumulative_flow;
        series.aum = record.aum;
    }

    let totals = FlowTotals {
        daily: (0..dates.len())
            .map(|i| etfs.iter().map(|etf| etf.daily_flows[i]).sum())
            .collect(),
        cumulative: (0..dates.len())
            .map(|i| etfs.iter().map(|etf| etf.cumulative_flows[i]).sum())
            .collect(),
        total_aum: etfs.iter().map(|etf| etf.aum).sum(),
    };

    Ok(FlowsResponse {
        dates: dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
        etfs,
        totals,
    })
}

/// Short-lived memo of flows responses, cleared by every update run.
#[derive(Clone)]
pub struct FlowsCache {
    cache: Option<Arc<Cache<(Category, u32, NaiveDate), FlowsResponse>>>,
}

impl FlowsCache {
    /// A TTL of zero disables caching.
    pub fn new(ttl_secs: u64) -> Self {
        if ttl_secs == 0 {
            return Self::disabled();
        }

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(std::time::Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache: Some(Arc::new(cache)),
        }
    }

    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub async fn get_or_load(
        &self,
        db: &DatabaseConnection,
        universe: &EtfUniverse,
        category: Category,
        days: u32,
    ) -> Result<FlowsResponse, DbErr> {
        let Some(cache) = &self.cache else {
            return get_flows(db, universe, category, days).await;
        };

        let key = (category, days, Utc::now().date_naive());

        if let Some(cached) = cache.get(&key).await {
            tracing::debug!("Cache hit for {} flows ({} days)", category, days);
            return Ok(cached);
        }

        let response = get_flows(db, universe, category, days).await?;
        cache.insert(key, response.clone()).await;

        Ok(response)
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_business_days_skip_weekends() {
        // 2024-06-17 is a Monday
        let days = business_days_ending(ymd(2024, 6, 17), 3);
        assert_eq!(days, vec![ymd(2024, 6, 13), ymd(2024, 6, 14), ymd(2024, 6, 17)]);
    }

    #[test]
    fn test_business_days_ending_on_weekend() {
        // Sunday: window ends on the preceding Friday
        let days = business_days_ending(ymd(2024, 6, 16), 2);
        assert_eq!(days, vec![ymd(2024, 6, 13), ymd(2024, 6, 14)]);
    }

    #[test]
    fn test_business_days_strictly_increasing_weekdays() {
        let days = business_days_ending(ymd(2024, 3, 1), 30);

        assert_eq!(days.len(), 30);
        assert!(days.iter().all(|d| is_business_day(*d)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(days.last(), Some(&ymd(2024, 3, 1)));
    }

    #[test]
    fn test_business_days_stop_at_min_date() {
        let end = NaiveDate::MIN + chrono::Duration::days(10);
        let days = business_days_ending(end, 1_000);

        assert!(!days.is_empty() && days.len() <= 11);
        assert!(days[0] >= NaiveDate::MIN);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_business_days_large_window() {
        let days = business_days_ending(ymd(2024, 6, 17), MAX_DAYS as usize);

        assert_eq!(days.len(), MAX_DAYS as usize);
        assert_eq!(days.last(), Some(&ymd(2024, 6, 17)));
        assert!(days.iter().all(|d| is_business_day(*d)));
    }

    #[test]
    fn test_business_days_zero() {
        assert!(business_days_ending(ymd(2024, 6, 17), 0).is_empty());
    }
}
