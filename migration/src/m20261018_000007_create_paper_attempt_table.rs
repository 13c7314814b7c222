use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaperAttempt::Table)
                    .if_not_exists()
                    .col(string(PaperAttempt::UserId))
                    .col(string(PaperAttempt::TestType))
                    .col(string(PaperAttempt::PaperId))
                    .col(string(PaperAttempt::Status))
                    .col(big_integer(PaperAttempt::EntitlementId))
                    .col(integer(PaperAttempt::QuestionCount))
                    .col(double(PaperAttempt::MarksPerQuestion))
                    .col(double(PaperAttempt::NegativeMarks))
                    .col(double_null(PaperAttempt::Score))
                    .col(big_integer(PaperAttempt::ValidFrom))
                    .col(big_integer(PaperAttempt::ValidUntil))
                    .col(big_integer(PaperAttempt::StartedDate))
                    .col(big_integer(PaperAttempt::UpdatedDate))
                    .col(big_integer_null(PaperAttempt::CompletedDate))
                    .primary_key(
                        Index::create()
                            .col(PaperAttempt::UserId)
                            .col(PaperAttempt::TestType)
                            .col(PaperAttempt::PaperId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_paper_attempt_user_status")
                    .table(PaperAttempt::Table)
                    .col(PaperAttempt::UserId)
                    .col(PaperAttempt::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaperAttempt::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PaperAttempt {
    Table,
    UserId,
    TestType,
    PaperId,
    Status,
    EntitlementId,
    QuestionCount,
    MarksPerQuestion,
    NegativeMarks,
    Score,
    ValidFrom,
    ValidUntil,
    StartedDate,
    UpdatedDate,
    CompletedDate,
}
