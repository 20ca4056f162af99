use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Not unique: one row per (ticker, date) is kept by the update job's upsert.
        // Serves the previous-cumulative lookup and the window query.
        manager
            .create_index(
                Index::create()
                    .name("idx_etf_flows_ticker_date")
                    .table(EtfFlows::Table)
                    .if_not_exists()
                    .col(EtfFlows::Ticker)
                    .col((EtfFlows::Date, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_etf_flows_ticker_date")
                    .table(EtfFlows::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum EtfFlows {
    Table,
    Ticker,
    Date,
}
