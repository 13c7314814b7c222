use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Purchase::Table)
                    .if_not_exists()
                    .col(big_integer(Purchase::Id).primary_key())
                    .col(string(Purchase::UserId))
                    .col(big_integer(Purchase::SubscriptionId))
                    .col(string(Purchase::Kind))
                    .col(string_null(Purchase::PaperId))
                    .col(big_integer(Purchase::AmountMinor))
                    .col(string(Purchase::Status))
                    .col(big_integer_null(Purchase::EntitlementId))
                    .col(big_integer(Purchase::CreatedDate))
                    .col(big_integer(Purchase::UpdatedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_user")
                    .table(Purchase::Table)
                    .col(Purchase::UserId)
                    .col(Purchase::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Purchase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Purchase {
    Table,
    Id,
    UserId,
    SubscriptionId,
    Kind,
    PaperId,
    AmountMinor,
    Status,
    EntitlementId,
    CreatedDate,
    UpdatedDate,
}
