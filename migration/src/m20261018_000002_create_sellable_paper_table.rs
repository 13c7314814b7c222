use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SellablePaper::Table)
                    .if_not_exists()
                    .col(string(SellablePaper::TestType))
                    .col(string(SellablePaper::Id))
                    .col(string(SellablePaper::Title))
                    .col(string(SellablePaper::Category))
                    .col(string(SellablePaper::SubCategory))
                    .col(string(SellablePaper::Status).default("DRAFT"))
                    .col(boolean(SellablePaper::Claimed).default(false))
                    .col(big_integer_null(SellablePaper::ClaimedBy))
                    .col(big_integer(SellablePaper::StartDate))
                    .col(big_integer(SellablePaper::EndDate))
                    .col(integer(SellablePaper::QuestionCount))
                    .col(double(SellablePaper::MarksPerQuestion))
                    .col(double(SellablePaper::NegativeMarks))
                    .primary_key(
                        Index::create()
                            .col(SellablePaper::TestType)
                            .col(SellablePaper::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sellable_paper_claimed")
                    .table(SellablePaper::Table)
                    .col(SellablePaper::TestType)
                    .col(SellablePaper::Claimed)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sellable_paper_classification")
                    .table(SellablePaper::Table)
                    .col(SellablePaper::TestType)
                    .col(SellablePaper::Status)
                    .col(SellablePaper::SubCategory)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SellablePaper::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SellablePaper {
    Table,
    TestType,
    Id,
    Title,
    Category,
    SubCategory,
    Status,
    Claimed,
    ClaimedBy,
    StartDate,
    EndDate,
    QuestionCount,
    MarksPerQuestion,
    NegativeMarks,
}
