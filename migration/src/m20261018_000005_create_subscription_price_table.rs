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
                    .table(SubscriptionPrice::Table)
                    .if_not_exists()
                    .col(big_integer(SubscriptionPrice::SubscriptionId))
                    .col(string(SubscriptionPrice::Kind))
                    .col(big_integer(SubscriptionPrice::AmountMinor))
                    .col(integer(SubscriptionPrice::DurationDays))
                    .primary_key(
                        Index::create()
                            .col(SubscriptionPrice::SubscriptionId)
                            .col(SubscriptionPrice::Kind),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_price_subscription_id")
                            .from(SubscriptionPrice::Table, SubscriptionPrice::SubscriptionId)
                            .to(Subscription::Table, Subscription::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriptionPrice::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SubscriptionPrice {
    Table,
    SubscriptionId,
    Kind,
    AmountMinor,
    DurationDays,
}
