//! Paper attempt factory for creating materialized attempts.

use chrono::Duration;
use entity::sea_orm_active_enums::{AttemptStatus, TestType};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{fixed_now, millis};

/// Factory for creating stored attempts.
///
/// Defaults to an INPROGRESS attempt started at [`fixed_now`] with the scoring
/// defaults of the paper factory.
pub struct PaperAttemptFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    test_type: TestType,
    paper_id: String,
    entitlement_id: i64,
    status: AttemptStatus,
    score: Option<f64>,
}

impl<'a> PaperAttemptFactory<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        user_id: impl Into<String>,
        test_type: TestType,
        paper_id: impl Into<String>,
        entitlement_id: i64,
    ) -> Self {
        Self {
            db,
            user_id: user_id.into(),
            test_type,
            paper_id: paper_id.into(),
            entitlement_id,
            status: AttemptStatus::InProgress,
            score: None,
        }
    }

    pub fn status(mut self, status: AttemptStatus) -> Self {
        self.status = status;
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Builds and inserts the attempt.
    ///
    /// # Returns
    /// - `Ok(entity::paper_attempt::Model)` - Created attempt
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::paper_attempt::Model, DbErr> {
        let now = millis(fixed_now());
        let completed_date = (self.status == AttemptStatus::Done).then_some(now);

        entity::paper_attempt::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            test_type: ActiveValue::Set(self.test_type),
            paper_id: ActiveValue::Set(self.paper_id),
            status: ActiveValue::Set(self.status),
            entitlement_id: ActiveValue::Set(self.entitlement_id),
            question_count: ActiveValue::Set(100),
            marks_per_question: ActiveValue::Set(1.0),
            negative_marks: ActiveValue::Set(0.25),
            score: ActiveValue::Set(self.score),
            valid_from: ActiveValue::Set(millis(fixed_now() - Duration::days(1))),
            valid_until: ActiveValue::Set(millis(fixed_now() + Duration::days(30))),
            started_date: ActiveValue::Set(now),
            updated_date: ActiveValue::Set(now),
            completed_date: ActiveValue::Set(completed_date),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an INPROGRESS attempt for a user and paper.
pub async fn create_attempt(
    db: &DatabaseConnection,
    user_id: impl Into<String>,
    test_type: TestType,
    paper_id: impl Into<String>,
    entitlement_id: i64,
) -> Result<entity::paper_attempt::Model, DbErr> {
    PaperAttemptFactory::new(db, user_id, test_type, paper_id, entitlement_id)
        .build()
        .await
}
