use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestSeriesPaper::Table)
                    .if_not_exists()
                    .col(big_integer(TestSeriesPaper::SubscriptionId))
                    .col(string(TestSeriesPaper::PaperId))
                    .col(integer(TestSeriesPaper::Position))
                    .primary_key(
                        Index::create()
                            .col(TestSeriesPaper::SubscriptionId)
                            .col(TestSeriesPaper::PaperId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestSeriesPaper::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestSeriesPaper {
    Table,
    SubscriptionId,
    PaperId,
    Position,
}
