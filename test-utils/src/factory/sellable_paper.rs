//! Sellable paper factory for creating test catalog entries.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{PaperState, TestType};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{fixed_now, millis, next_id};

/// Factory for creating test catalog papers with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let paper = SellablePaperFactory::new(&db, TestType::Paid)
///     .id("P1")
///     .claimed_by(subscription.id)
///     .build()
///     .await?;
/// ```
pub struct SellablePaperFactory<'a> {
    db: &'a DatabaseConnection,
    test_type: TestType,
    id: String,
    title: String,
    category: String,
    sub_category: String,
    status: PaperState,
    claimed_by: Option<i64>,
    claimed: bool,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    question_count: i32,
    marks_per_question: f64,
    negative_marks: f64,
}

impl<'a> SellablePaperFactory<'a> {
    /// Creates a new SellablePaperFactory with default values.
    ///
    /// Defaults:
    /// - id: `"paper-{n}"`, title: `"Paper {n}"` where n is auto-incremented
    /// - category `"BANKING"`, sub-category `"PO"`, status APPROVED, unclaimed
    /// - valid from a day before [`fixed_now`] for a year
    /// - 100 questions, 1 mark each, 0.25 negative marks
    pub fn new(db: &'a DatabaseConnection, test_type: TestType) -> Self {
        let n = next_id();
        Self {
            db,
            test_type,
            id: format!("paper-{}", n),
            title: format!("Paper {}", n),
            category: "BANKING".to_string(),
            sub_category: "PO".to_string(),
            status: PaperState::Approved,
            claimed_by: None,
            claimed: false,
            start_date: fixed_now() - Duration::days(1),
            end_date: fixed_now() + Duration::days(365),
            question_count: 100,
            marks_per_question: 1.0,
            negative_marks: 0.25,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = sub_category.into();
        self
    }

    pub fn status(mut self, status: PaperState) -> Self {
        self.status = status;
        self
    }

    /// Marks the paper as claimed by a subscription.
    pub fn claimed_by(mut self, subscription_id: i64) -> Self {
        self.claimed = true;
        self.claimed_by = Some(subscription_id);
        self
    }

    /// Marks the paper as claimed without recording a holder.
    pub fn claimed_without_holder(mut self) -> Self {
        self.claimed = true;
        self.claimed_by = None;
        self
    }

    /// Sets the scoring metadata.
    pub fn scoring(
        mut self,
        question_count: i32,
        marks_per_question: f64,
        negative_marks: f64,
    ) -> Self {
        self.question_count = question_count;
        self.marks_per_question = marks_per_question;
        self.negative_marks = negative_marks;
        self
    }

    /// Builds and inserts the paper into the database.
    ///
    /// # Returns
    /// - `Ok(entity::sellable_paper::Model)` - Created paper
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::sellable_paper::Model, DbErr> {
        entity::sellable_paper::ActiveModel {
            test_type: ActiveValue::Set(self.test_type),
            id: ActiveValue::Set(self.id),
            title: ActiveValue::Set(self.title),
            category: ActiveValue::Set(self.category),
            sub_category: ActiveValue::Set(self.sub_category),
            status: ActiveValue::Set(self.status),
            claimed: ActiveValue::Set(self.claimed),
            claimed_by: ActiveValue::Set(self.claimed_by),
            start_date: ActiveValue::Set(millis(self.start_date)),
            end_date: ActiveValue::Set(millis(self.end_date)),
            question_count: ActiveValue::Set(self.question_count),
            marks_per_question: ActiveValue::Set(self.marks_per_question),
            negative_marks: ActiveValue::Set(self.negative_marks),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an unclaimed approved paper with default values.
///
/// Shorthand for `SellablePaperFactory::new(db, test_type).build().await`.
pub async fn create_paper(
    db: &DatabaseConnection,
    test_type: TestType,
) -> Result<entity::sellable_paper::Model, DbErr> {
    SellablePaperFactory::new(db, test_type).build().await
}
