pub use sea_orm_migration::prelude::*;

mod m20241104_000001_create_etf_flows;
mod m20241104_000002_add_etf_flows_ticker_date_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241104_000001_create_etf_flows::Migration),
            Box::new(m20241104_000002_add_etf_flows_ticker_date_index::Migration),
        ]
    }
}
