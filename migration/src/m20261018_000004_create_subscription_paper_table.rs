use sea_orm_migration::{prelude::*, schema::*};

use super::m20261018_000003_create_subscription_table::Subscription;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPaper::Table)
                    .if_not_exists()
                    .col(big_integer(SubscriptionPaper::SubscriptionId))
                    .col(string(SubscriptionPaper::PaperId))
                    .col(string(SubscriptionPaper::TestType))
                    .col(integer(SubscriptionPaper::Position))
                    .primary_key(
                        Index::create()
                            .col(SubscriptionPaper::SubscriptionId)
                            .col(SubscriptionPaper::PaperId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_paper_subscription_id")
                            .from(SubscriptionPaper::Table, SubscriptionPaper::SubscriptionId)
                            .to(Subscription::Table, Subscription::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_paper_paper")
                    .table(SubscriptionPaper::Table)
                    .col(SubscriptionPaper::TestType)
                    .col(SubscriptionPaper::PaperId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriptionPaper::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SubscriptionPaper {
    Table,
    SubscriptionId,
    PaperId,
    TestType,
    Position,
}
