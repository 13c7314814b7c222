use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(big_integer(Subscription::Id).primary_key())
                    .col(string(Subscription::Name))
                    .col(text_null(Subscription::Description))
                    .col(string(Subscription::TestType))
                    .col(string(Subscription::Category))
                    .col(string(Subscription::SubCategory))
                    .col(string(Subscription::CommerceType))
                    .col(string(Subscription::State).default("DRAFT"))
                    .col(big_integer(Subscription::Validity))
                    .col(big_integer(Subscription::CreatedDate))
                    .col(big_integer_null(Subscription::ActiveDate))
                    .col(big_integer(Subscription::UpdatedDate))
                    .col(integer(Subscription::SubscriberCount).default(0))
                    .col(big_integer(Subscription::RevenueMinor).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_state_type")
                    .table(Subscription::Table)
                    .col(Subscription::State)
                    .col(Subscription::TestType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_validity")
                    .table(Subscription::Table)
                    .col(Subscription::Validity)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Subscription {
    Table,
    Id,
    Name,
    Description,
    TestType,
    Category,
    SubCategory,
    CommerceType,
    State,
    Validity,
    CreatedDate,
    ActiveDate,
    UpdatedDate,
    SubscriberCount,
    RevenueMinor,
}
