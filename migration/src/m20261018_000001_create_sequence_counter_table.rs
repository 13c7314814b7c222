use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SequenceCounter::Table)
                    .if_not_exists()
                    .col(string(SequenceCounter::Category).primary_key())
                    .col(big_integer(SequenceCounter::Value).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SequenceCounter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SequenceCounter {
    Table,
    Category,
    Value,
}
