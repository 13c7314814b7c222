//! Attempt recorder.
//!
//! The write path for paper attempts. A user's first write past `START`
//! materializes the attempt from the catalog and the authorizing grant; later
//! writes follow the attempt state machine. `DONE` is never left.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::AttemptStatus;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::{
    data::{attempt::PaperAttemptRepository, paper::SellablePaperRepository},
    error::{
        entitlement::EntitlementError, internal::InternalError, validation::ValidationError,
        AppError,
    },
    model::{
        attempt::{can_transition, AttemptWrite, NewAttempt, PaperAttempt, RecordAttemptParams},
        subscription::ClassificationFilter,
    },
    service::entitlement::EntitlementService,
};

pub struct AttemptService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AttemptService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records attempt progress for a user.
    ///
    /// # Returns
    /// - `Ok(AttemptWrite::Created)` - First write; the attempt was materialized
    /// - `Ok(AttemptWrite::Updated)` - Stored attempt moved to the new status
    /// - `Ok(AttemptWrite::IgnoredTerminal)` - Attempt is DONE; nothing changed
    /// - `Err(ValidationError::StartNotWritable)` - START was requested
    /// - `Err(ValidationError::IllegalAttemptTransition)` - Move outside the state machine
    /// - `Err(EntitlementError::NotEntitled)` - First write for a paper the user cannot access
    pub async fn record(
        &self,
        params: RecordAttemptParams,
        now: DateTime<Utc>,
    ) -> Result<AttemptWrite, AppError> {
        if params.status == AttemptStatus::Start {
            return Err(ValidationError::StartNotWritable.into());
        }

        let repo = PaperAttemptRepository::new(self.db);

        if let Some(existing) = repo
            .get(&params.user_id, params.test_type, &params.paper_id)
            .await?
        {
            return self.advance(existing, params, now).await;
        }

        let grant = EntitlementService::new(self.db)
            .resolve_accessible_papers(
                &params.user_id,
                now,
                &ClassificationFilter::test_type(params.test_type),
            )
            .await?
            .into_iter()
            .find(|p| p.paper_id == params.paper_id)
            .ok_or_else(|| EntitlementError::NotEntitled {
                user_id: params.user_id.clone(),
                paper_id: params.paper_id.clone(),
            })?;

        let paper = SellablePaperRepository::new(self.db)
            .get_by_id(params.test_type, &params.paper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Paper {} not found", params.paper_id)))?;

        let inserted = repo
            .insert(NewAttempt {
                user_id: params.user_id.clone(),
                test_type: params.test_type,
                paper_id: params.paper_id.clone(),
                status: params.status,
                entitlement_id: grant.entitlement_id,
                scoring: paper.scoring,
                score: params.score,
                window: grant.window,
                now,
            })
            .await?;

        match inserted {
            Some(attempt) => {
                info!(
                    "User {} started paper {} ({:?}) as {:?} under entitlement {}",
                    attempt.user_id,
                    attempt.paper_id,
                    attempt.test_type,
                    attempt.status,
                    attempt.entitlement_id
                );
                Ok(AttemptWrite::Created(attempt))
            }
            None => {
                // A concurrent first write won; continue from its row.
                let existing = self.reload(&params).await?;
                self.advance(existing, params, now).await
            }
        }
    }

    async fn advance(
        &self,
        existing: PaperAttempt,
        params: RecordAttemptParams,
        now: DateTime<Utc>,
    ) -> Result<AttemptWrite, AppError> {
        if existing.status == AttemptStatus::Done {
            return Ok(self.ignore_terminal(existing, params.status));
        }

        if !can_transition(existing.status, params.status) {
            return Err(ValidationError::IllegalAttemptTransition {
                from: existing.status,
                to: params.status,
            }
            .into());
        }

        let updated = PaperAttemptRepository::new(self.db)
            .update_unless_done(
                &params.user_id,
                params.test_type,
                &params.paper_id,
                params.status,
                params.score,
                now,
            )
            .await?;

        let attempt = self.reload(&params).await?;

        if !updated {
            return Ok(self.ignore_terminal(attempt, params.status));
        }

        Ok(AttemptWrite::Updated(attempt))
    }

    fn ignore_terminal(&self, attempt: PaperAttempt, requested: AttemptStatus) -> AttemptWrite {
        warn!(
            "Ignoring {:?} write for user {} on completed paper {} ({:?})",
            requested, attempt.user_id, attempt.paper_id, attempt.test_type
        );

        AttemptWrite::IgnoredTerminal(attempt)
    }

    async fn reload(&self, params: &RecordAttemptParams) -> Result<PaperAttempt, AppError> {
        PaperAttemptRepository::new(self.db)
            .get(&params.user_id, params.test_type, &params.paper_id)
            .await?
            .ok_or_else(|| {
                InternalError::MissingAfterWrite {
                    entity: "Paper attempt",
                    key: format!("{}/{:?}/{}", params.user_id, params.test_type, params.paper_id),
                }
                .into()
            })
    }
}
