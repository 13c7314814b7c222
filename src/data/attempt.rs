use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{AttemptStatus, TestType};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, SqlErr,
};

use crate::{
    model::attempt::{NewAttempt, PaperAttempt},
    util::time::to_millis,
};

/// Repository for materialized paper attempts.
pub struct PaperAttemptRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaperAttemptRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(
        &self,
        user_id: &str,
        test_type: TestType,
        paper_id: &str,
    ) -> Result<Option<PaperAttempt>, DbErr> {
        entity::prelude::PaperAttempt::find_by_id((
            user_id.to_string(),
            test_type,
            paper_id.to_string(),
        ))
        .one(self.db)
        .await?
        .map(PaperAttempt::from_entity)
        .transpose()
    }

    /// Gets a user's stored attempts for a set of papers of one test type.
    pub async fn find_for_papers(
        &self,
        user_id: &str,
        test_type: TestType,
        paper_ids: &[String],
    ) -> Result<Vec<PaperAttempt>, DbErr> {
        if paper_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::PaperAttempt::find()
            .filter(entity::paper_attempt::Column::UserId.eq(user_id))
            .filter(entity::paper_attempt::Column::TestType.eq(test_type))
            .filter(entity::paper_attempt::Column::PaperId.is_in(paper_ids.iter().cloned()))
            .all(self.db)
            .await?
            .into_iter()
            .map(PaperAttempt::from_entity)
            .collect()
    }

    /// Materializes an attempt row.
    ///
    /// # Returns
    /// - `Ok(Some(PaperAttempt))` - Row created
    /// - `Ok(None)` - A row for the same user and paper already exists
    /// - `Err(DbErr)` - Any other database error
    pub async fn insert(&self, params: NewAttempt) -> Result<Option<PaperAttempt>, DbErr> {
        let now = to_millis(params.now);

        let result = entity::paper_attempt::ActiveModel {
            user_id: ActiveValue::Set(params.user_id),
            test_type: ActiveValue::Set(params.test_type),
            paper_id: ActiveValue::Set(params.paper_id),
            status: ActiveValue::Set(params.status),
            entitlement_id: ActiveValue::Set(params.entitlement_id),
            question_count: ActiveValue::Set(params.scoring.question_count),
            marks_per_question: ActiveValue::Set(params.scoring.marks_per_question),
            negative_marks: ActiveValue::Set(params.scoring.negative_marks),
            score: ActiveValue::Set(params.score),
            valid_from: ActiveValue::Set(to_millis(params.window.valid_from)),
            valid_until: ActiveValue::Set(to_millis(params.window.valid_until)),
            started_date: ActiveValue::Set(now),
            updated_date: ActiveValue::Set(now),
            completed_date: ActiveValue::Set((params.status == AttemptStatus::Done).then_some(now)),
        }
        .insert(self.db)
        .await;

        match result {
            Ok(attempt) => Ok(Some(PaperAttempt::from_entity(attempt)?)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Moves a stored attempt to a new status unless it is already DONE.
    ///
    /// Runs as one conditional update so a concurrent completion cannot be
    /// overwritten. `score` replaces the stored score only when given. Moving to
    /// DONE stamps the completion date.
    ///
    /// # Returns
    /// - `Ok(true)` - The row was updated
    /// - `Ok(false)` - No row, or the row is DONE
    pub async fn update_unless_done(
        &self,
        user_id: &str,
        test_type: TestType,
        paper_id: &str,
        status: AttemptStatus,
        score: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let now = to_millis(now);

        let mut update = entity::prelude::PaperAttempt::update_many()
            .col_expr(entity::paper_attempt::Column::Status, Expr::value(status))
            .col_expr(entity::paper_attempt::Column::UpdatedDate, Expr::value(now));

        if let Some(score) = score {
            update = update.col_expr(entity::paper_attempt::Column::Score, Expr::value(score));
        }
        if status == AttemptStatus::Done {
            update = update.col_expr(
                entity::paper_attempt::Column::CompletedDate,
                Expr::value(now),
            );
        }

        let result = update
            .filter(entity::paper_attempt::Column::UserId.eq(user_id))
            .filter(entity::paper_attempt::Column::TestType.eq(test_type))
            .filter(entity::paper_attempt::Column::PaperId.eq(paper_id))
            .filter(entity::paper_attempt::Column::Status.ne(AttemptStatus::Done))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
