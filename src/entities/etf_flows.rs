//! `SeaORM` Entity for etf_flows table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "etf_flows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub ticker: String,
    /// 'BTC' or 'ETH'
    #[sea_orm(column_name = "type")]
    pub crypto_type: String,
    #[sea_orm(column_type = "Double")]
    pub daily_flow: f64,
    #[sea_orm(column_type = "Double")]
    pub cumulative_flow: f64,
    #[sea_orm(column_type = "Double")]
    pub aum: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
