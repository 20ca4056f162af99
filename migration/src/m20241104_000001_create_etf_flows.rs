use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EtfFlows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EtfFlows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EtfFlows::Date)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EtfFlows::Ticker)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EtfFlows::Type)
                            .string()
                            .not_null(), // 'BTC' or 'ETH'
                    )
                    .col(
                        ColumnDef::new(EtfFlows::DailyFlow)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EtfFlows::CumulativeFlow)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EtfFlows::Aum)
                            .double()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EtfFlows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EtfFlows {
    Table,
    Id,
    Date,
    Ticker,
    Type,
    DailyFlow,
    CumulativeFlow,
    Aum,
}
