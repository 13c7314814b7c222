//! Paper status reconciler.
//!
//! Merges a user's stored attempts with virtual `START` placeholders for the
//! accessible papers they have not opened. Read-only.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{AttemptStatus, TestType};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::warn;

use crate::{
    data::{attempt::PaperAttemptRepository, paper::SellablePaperRepository},
    error::AppError,
    model::{
        attempt::{PaperStatusView, ReconcileMode},
        entitlement::AccessiblePaper,
        subscription::ClassificationFilter,
    },
    service::entitlement::EntitlementService,
};

pub struct PaperStatusService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaperStatusService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the per-paper status of a user for candidates of one test type.
    ///
    /// Candidates with a stored attempt come first, then placeholders, each group
    /// in candidate order. Candidates of another test type are ignored and
    /// candidates missing from the catalog get no placeholder.
    ///
    /// # Arguments
    /// - `user_id` - User whose attempts are read
    /// - `test_type` - Catalog of the candidates
    /// - `candidates` - Accessible papers with their authorizing grants
    /// - `mode` - Whether DONE attempts are kept
    pub async fn reconcile(
        &self,
        user_id: &str,
        test_type: TestType,
        candidates: &[AccessiblePaper],
        mode: ReconcileMode,
    ) -> Result<Vec<PaperStatusView>, AppError> {
        let candidates: Vec<&AccessiblePaper> = candidates
            .iter()
            .filter(|c| c.test_type == test_type)
            .collect();
        let paper_ids: Vec<String> = candidates.iter().map(|c| c.paper_id.clone()).collect();

        let mut attempts: HashMap<String, _> = PaperAttemptRepository::new(self.db)
            .find_for_papers(user_id, test_type, &paper_ids)
            .await?
            .into_iter()
            .map(|a| (a.paper_id.clone(), a))
            .collect();

        let catalog: HashMap<String, _> = SellablePaperRepository::new(self.db)
            .find_many(test_type, &paper_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut attempted = Vec::new();
        let mut placeholders = Vec::new();

        for candidate in candidates {
            let catalog_entry = catalog.get(&candidate.paper_id);

            if let Some(attempt) = attempts.remove(&candidate.paper_id) {
                if mode == ReconcileMode::Outstanding && attempt.status == AttemptStatus::Done {
                    continue;
                }

                let title = catalog_entry
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| attempt.paper_id.clone());
                attempted.push(PaperStatusView::from_attempt(attempt, title));
                continue;
            }

            match catalog_entry {
                Some(paper) => placeholders.push(PaperStatusView::placeholder(paper, candidate)),
                None => warn!(
                    "Accessible paper {} ({:?}) for user {} is missing from the catalog",
                    candidate.paper_id, test_type, user_id
                ),
            }
        }

        attempted.extend(placeholders);

        Ok(attempted)
    }

    /// Resolves the user's accessible papers and reconciles them per test type.
    ///
    /// Test types appear in the order their first paper is accessible.
    pub async fn my_papers(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        filter: &ClassificationFilter,
        mode: ReconcileMode,
    ) -> Result<Vec<PaperStatusView>, AppError> {
        let accessible = EntitlementService::new(self.db)
            .resolve_accessible_papers(user_id, now, filter)
            .await?;

        let mut test_types: Vec<TestType> = Vec::new();
        for paper in &accessible {
            if !test_types.contains(&paper.test_type) {
                test_types.push(paper.test_type);
            }
        }

        let mut views = Vec::new();
        for test_type in test_types {
            views.extend(
                self.reconcile(user_id, test_type, &accessible, mode)
                    .await?,
            );
        }

        Ok(views)
    }
}
