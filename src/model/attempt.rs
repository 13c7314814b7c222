//! Paper attempt domain models.
//!
//! Attempts are materialized lazily: a user sees virtual `START` placeholders for
//! every accessible paper, and a row is only written once the user moves a paper
//! past `START`. `DONE` is terminal.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{AttemptStatus, TestType};
use sea_orm::DbErr;
use serde::Serialize;

use crate::{
    model::{
        entitlement::{AccessiblePaper, ValidityWindow},
        paper::{Scoring, SellablePaper},
    },
    util::time::{from_millis, from_millis_opt},
};

/// Checks a move in the attempt state machine.
///
/// `START -> INPROGRESS | RESUME | DONE`, `INPROGRESS <-> RESUME`,
/// `INPROGRESS | RESUME -> DONE`. Nothing leaves `DONE` and nothing returns to
/// `START`. Repeating `INPROGRESS` or `RESUME` is allowed so progress saves can
/// update the score.
pub fn can_transition(from: AttemptStatus, to: AttemptStatus) -> bool {
    use AttemptStatus::*;

    match (from, to) {
        (Done, _) | (_, Start) => false,
        (Start | InProgress | Resume, InProgress | Resume | Done) => true,
    }
}

/// Persisted attempt of one paper by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperAttempt {
    pub user_id: String,
    pub test_type: TestType,
    pub paper_id: String,
    pub status: AttemptStatus,
    /// Grant that authorized the attempt when it was first materialized.
    pub entitlement_id: i64,
    pub scoring: Scoring,
    pub score: Option<f64>,
    pub window: ValidityWindow,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaperAttempt {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::paper_attempt::Model) -> Result<Self, DbErr> {
        Ok(Self {
            user_id: entity.user_id,
            test_type: entity.test_type,
            paper_id: entity.paper_id,
            status: entity.status,
            entitlement_id: entity.entitlement_id,
            scoring: Scoring {
                question_count: entity.question_count,
                marks_per_question: entity.marks_per_question,
                negative_marks: entity.negative_marks,
            },
            score: entity.score,
            window: ValidityWindow {
                valid_from: from_millis(entity.valid_from)?,
                valid_until: from_millis(entity.valid_until)?,
            },
            started_at: from_millis(entity.started_date)?,
            updated_at: from_millis(entity.updated_date)?,
            completed_at: from_millis_opt(entity.completed_date)?,
        })
    }
}

/// Parameters for recording attempt progress.
#[derive(Debug, Clone)]
pub struct RecordAttemptParams {
    pub user_id: String,
    pub test_type: TestType,
    pub paper_id: String,
    pub status: AttemptStatus,
    /// Score to store; `None` keeps the stored score.
    pub score: Option<f64>,
}

/// Result of an attempt write.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptWrite {
    /// First write past START created the row.
    Created(PaperAttempt),
    /// Existing row moved to the requested status.
    Updated(PaperAttempt),
    /// The attempt is already DONE; the write was skipped.
    IgnoredTerminal(PaperAttempt),
}

/// Which attempts `reconcile` keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Every accessible paper, completed ones included.
    All,
    /// Drop papers whose attempt is DONE.
    Outstanding,
}

/// Per-paper status shown to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperStatusView {
    pub test_type: TestType,
    pub paper_id: String,
    pub title: String,
    pub status: AttemptStatus,
    pub scoring: Scoring,
    pub score: Option<f64>,
    pub window: ValidityWindow,
    /// `false` for synthesized `START` placeholders.
    pub materialized: bool,
}

impl PaperStatusView {
    /// View of a stored attempt.
    pub fn from_attempt(attempt: PaperAttempt, title: String) -> Self {
        Self {
            test_type: attempt.test_type,
            paper_id: attempt.paper_id,
            title,
            status: attempt.status,
            scoring: attempt.scoring,
            score: attempt.score,
            window: attempt.window,
            materialized: true,
        }
    }

    /// Virtual `START` placeholder for a paper the user has not opened yet.
    pub fn placeholder(paper: &SellablePaper, grant: &AccessiblePaper) -> Self {
        Self {
            test_type: paper.test_type,
            paper_id: paper.id.clone(),
            title: paper.title.clone(),
            status: AttemptStatus::Start,
            scoring: paper.scoring,
            score: None,
            window: grant.window,
            materialized: false,
        }
    }
}

/// Row data handed to the repository when materializing an attempt.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: String,
    pub test_type: TestType,
    pub paper_id: String,
    pub status: AttemptStatus,
    pub entitlement_id: i64,
    pub scoring: Scoring,
    pub score: Option<f64>,
    pub window: ValidityWindow,
    pub now: DateTime<Utc>,
}
