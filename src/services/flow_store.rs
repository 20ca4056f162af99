//! Access to the `etf_flows` table.
//!
//! Every function is generic over `ConnectionTrait` so the update job can run
//! them inside a per-ticker transaction.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, Order,
    QueryFilter, QueryOrder, Set,
};

use crate::config::Category;
use crate::entities::{etf_flows, prelude::*};

/// Values computed for one (ticker, date) row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowValues {
    pub daily_flow: f64,
    pub cumulative_flow: f64,
    pub aum: f64,
}

/// Wipe every stored flow and restart the id sequence.
pub async fn truncate<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    match db.get_database_backend() {
        DbBackend::Postgres => {
            db.execute_unprepared("TRUNCATE TABLE etf_flows RESTART IDENTITY")
                .await?;
        }
        DbBackend::MySql => {
            db.execute_unprepared("TRUNCATE TABLE etf_flows").await?;
        }
        _ => {
            EtfFlows::delete_many().exec(db).await?;
            db.execute_unprepared("DELETE FROM sqlite_sequence WHERE name = 'etf_flows'")
                .await?;
        }
    }
    Ok(())
}

/// Most recent record for `ticker` strictly before `date`.
pub async fn find_previous<C: ConnectionTrait>(
    db: &C,
    ticker: &str,
    date: NaiveDate,
) -> Result<Option<etf_flows::Model>, DbErr> {
    EtfFlows::find()
        .filter(etf_flows::Column::Ticker.eq(ticker))
        .filter(etf_flows::Column::Date.lt(date))
        .order_by(etf_flows::Column::Date, Order::Desc)
        .one(db)
        .await
}

pub async fn find_on_date<C: ConnectionTrait>(
    db: &C,
    ticker: &str,
    date: NaiveDate,
) -> Result<Option<etf_flows::Model>, DbErr> {
    EtfFlows::find()
        .filter(etf_flows::Column::Ticker.eq(ticker))
        .filter(etf_flows::Column::Date.eq(date))
        .one(db)
        .await
}

/// Overwrite the (ticker, date) row if present, otherwise insert it.
/// Returns true when a new row was inserted.
pub async fn upsert_flow<C: ConnectionTrait>(
    db: &C,
    category: Category,
    ticker: &str,
    date: NaiveDate,
    values: FlowValues,
) -> Result<bool, DbErr> {
    match find_on_date(db, ticker, date).await? {
        Some(existing) => {
            let mut active_model: etf_flows::ActiveModel = existing.into();
            active_model.daily_flow = Set(values.daily_flow);
            active_model.cumulative_flow = Set(values.cumulative_flow);
            active_model.aum = Set(values.aum);
            active_model.update(db).await?;
            Ok(false)
        }
        None => {
            let new_flow = etf_flows::ActiveModel {
                date: Set(date),
                ticker: Set(ticker.to_string()),
                crypto_type: Set(category.as_str().to_string()),
                daily_flow: Set(values.daily_flow),
                cumulative_flow: Set(values.cumulative_flow),
                aum: Set(values.aum),
                ..Default::default()
            };
            new_flow.insert(db).await?;
            Ok(true)
        }
    }
}

/// All records for `tickers` dated within `[first, last]`, oldest first.
pub async fn find_in_window<C: ConnectionTrait>(
    db: &C,
    tickers: &[String],
    first: NaiveDate,
    last: NaiveDate,
) -> Result<Vec<etf_flows::Model>, DbErr> {
    if tickers.is_empty() || first > last {
        return Ok(Vec::new());
    }

    EtfFlows::find()
        .filter(etf_flows::Column::Ticker.is_in(tickers.iter().cloned()))
        .filter(etf_flows::Column::Date.between(first, last))
        .order_by(etf_flows::Column::Date, Order::Asc)
        .order_by(etf_flows::Column::Id, Order::Asc)
        .all(db)
        .await
}
