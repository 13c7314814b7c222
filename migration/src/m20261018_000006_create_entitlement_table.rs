use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entitlement::Table)
                    .if_not_exists()
                    .col(big_integer(Entitlement::Id).primary_key())
                    .col(string(Entitlement::UserId))
                    .col(big_integer(Entitlement::SubscriptionId))
                    .col(string(Entitlement::Kind))
                    .col(string_null(Entitlement::PaperId))
                    .col(big_integer(Entitlement::CreatedDate))
                    .col(big_integer(Entitlement::Validity))
                    .col(boolean(Entitlement::Active).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entitlement_user_live")
                    .table(Entitlement::Table)
                    .col(Entitlement::UserId)
                    .col(Entitlement::Active)
                    .col(Entitlement::Validity)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entitlement_kind")
                    .table(Entitlement::Table)
                    .col(Entitlement::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entitlement::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Entitlement {
    Table,
    Id,
    UserId,
    SubscriptionId,
    Kind,
    PaperId,
    CreatedDate,
    Validity,
    Active,
}
