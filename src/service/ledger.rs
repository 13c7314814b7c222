//! Paper availability ledger.
//!
//! Tracks which subscription holds each sellable paper. A paper is held by at most
//! one ACTIVE subscription; claims are taken with conditional writes and released
//! in compensation when a multi-paper claim fails part way.

use entity::sea_orm_active_enums::{PaperState, SubscriptionState, TestType};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

use crate::{
    data::{
        paper::SellablePaperRepository,
        subscription::{ActiveHolder, SubscriptionRepository},
    },
    error::{
        integrity::IntegrityError, subscription::SubscriptionError, validation::ValidationError,
        AppError,
    },
    model::{
        paper::{ClaimAnomaly, SellablePaper},
        subscription::PaperConflict,
    },
};

/// Ledger operations on a plain connection or inside a caller's transaction.
pub struct LedgerService<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LedgerService<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds every paper in `paper_ids` that a subscription other than `exclude`
    /// holds.
    ///
    /// A paper conflicts when an ACTIVE subscription bundles it or when the ledger
    /// shows a claim by someone else. The holder reported is the lowest-ID active
    /// subscription bundling the paper, falling back to the ledger's claim holder.
    ///
    /// # Arguments
    /// - `test_type` - Catalog the papers belong to
    /// - `paper_ids` - Papers to check, in the order conflicts should be reported
    /// - `exclude` - Subscription whose own claims do not count as conflicts
    ///
    /// # Returns
    /// - `Ok(Vec<PaperConflict>)` - Conflicting papers; empty when all are available
    /// - `Err(AppError::NotFound)` - A paper is missing from the catalog
    /// - `Err(AppError::Integrity)` - A paper is bundled by two or more active subscriptions
    pub async fn check_availability(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        exclude: Option<i64>,
    ) -> Result<Vec<PaperConflict>, AppError> {
        let papers = self.load_papers(test_type, paper_ids).await?;

        let missing: Vec<&str> = paper_ids
            .iter()
            .filter(|id| !papers.contains_key(id.as_str()))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::NotFound(format!(
                "Papers not found in {:?} catalog: {}",
                test_type,
                missing.join(", ")
            )));
        }

        self.conflicts_for(test_type, paper_ids, &papers, exclude)
            .await
    }

    /// Claims every paper for a subscription.
    ///
    /// Each claim is a conditional write. If any paper turns out to be held by
    /// someone else, the claims taken by this call are released before the
    /// conflict is reported, so a failed call leaves no claims behind. Papers
    /// already held by `subscription_id` count as claimed.
    ///
    /// # Returns
    /// - `Ok(())` - Every paper is held by `subscription_id`
    /// - `Err(SubscriptionError::PapersClaimed)` - Late conflict; nothing is held by this call
    pub async fn claim_all(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        subscription_id: i64,
    ) -> Result<(), AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);

        let mut claimed = Vec::new();
        let mut failed = Vec::new();

        for paper_id in paper_ids {
            if paper_repo
                .try_claim(test_type, paper_id, subscription_id)
                .await?
            {
                claimed.push(paper_id.clone());
                continue;
            }

            let held_by_self = paper_repo
                .get_by_id(test_type, paper_id)
                .await?
                .is_some_and(|p| p.claimed && p.claimed_by == Some(subscription_id));

            if !held_by_self {
                failed.push(paper_id.clone());
            }
        }

        if failed.is_empty() {
            info!(
                "Subscription {} claimed {} {:?} papers",
                subscription_id,
                claimed.len(),
                test_type
            );
            return Ok(());
        }

        let released = paper_repo
            .release(test_type, &claimed, subscription_id)
            .await?;

        warn!(
            "Subscription {} lost the race for {:?} papers {:?}; released {} claims taken in this request",
            subscription_id, test_type, failed, released
        );

        let papers = self.load_papers(test_type, &failed).await?;
        let mut conflicts = self
            .conflicts_for(test_type, &failed, &papers, Some(subscription_id))
            .await?;

        // The other claim may have been released again in the meantime.
        if conflicts.is_empty() {
            conflicts = failed
                .into_iter()
                .map(|paper_id| PaperConflict {
                    paper_id,
                    subscription_id: None,
                    subscription_name: None,
                })
                .collect();
        }

        Err(SubscriptionError::PapersClaimed { conflicts }.into())
    }

    /// Releases the claims `subscription_id` holds on the given papers.
    ///
    /// Papers held by other subscriptions are untouched.
    pub async fn release_all(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        subscription_id: i64,
    ) -> Result<u64, AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);

        let released = paper_repo
            .release(test_type, paper_ids, subscription_id)
            .await?;

        info!(
            "Subscription {} released {} of {} {:?} papers",
            subscription_id,
            released,
            paper_ids.len(),
            test_type
        );

        Ok(released)
    }

    /// Moves a paper forward in its DRAFT -> ACTIVE -> APPROVED lifecycle.
    ///
    /// # Returns
    /// - `Ok(SellablePaper)` - Paper with its new status
    /// - `Err(AppError::NotFound)` - No such paper
    /// - `Err(ValidationError::PaperStateRegression)` - Target is not after the current status
    pub async fn advance_status(
        &self,
        test_type: TestType,
        paper_id: &str,
        target: PaperState,
    ) -> Result<SellablePaper, AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);

        let paper = paper_repo
            .get_by_id(test_type, paper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Paper {} not found", paper_id)))?;

        if target.rank() <= paper.status.rank() {
            return Err(ValidationError::PaperStateRegression {
                paper_id: paper_id.to_string(),
                from: paper.status,
                to: target,
            }
            .into());
        }

        paper_repo.set_status(test_type, paper_id, target).await?;

        Ok(SellablePaper {
            status: target,
            ..paper
        })
    }

    /// Lists unclaimed approved papers, optionally narrowed by classification.
    pub async fn list_claimable(
        &self,
        test_type: TestType,
        category: Option<&str>,
        sub_category: Option<&str>,
    ) -> Result<Vec<SellablePaper>, AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);

        Ok(paper_repo
            .list_claimable(test_type, category, sub_category)
            .await?)
    }

    /// Compares ACTIVE subscription bundles against the ledger for one catalog.
    ///
    /// Reports only; nothing is corrected.
    ///
    /// # Returns
    /// - `Ok(Vec<ClaimAnomaly>)` - Every violation found, grouped by kind
    pub async fn audit_claims(&self, test_type: TestType) -> Result<Vec<ClaimAnomaly>, AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);
        let subscription_repo = SubscriptionRepository::new(self.db);

        let active = subscription_repo
            .list_by_state(test_type, SubscriptionState::Active)
            .await?;

        let mut bundled_by: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for subscription in &active {
            for paper_id in &subscription.paper_ids {
                bundled_by
                    .entry(paper_id.clone())
                    .or_default()
                    .push(subscription.id);
            }
        }

        let bundled_ids: Vec<String> = bundled_by.keys().cloned().collect();
        let papers = self.load_papers(test_type, &bundled_ids).await?;

        let mut anomalies = Vec::new();

        for (paper_id, subscription_ids) in &bundled_by {
            if subscription_ids.len() > 1 {
                anomalies.push(ClaimAnomaly::MultipleClaimants {
                    paper_id: paper_id.clone(),
                    subscription_ids: subscription_ids.clone(),
                });
            }
        }

        for subscription in &active {
            for paper_id in &subscription.paper_ids {
                match papers.get(paper_id.as_str()) {
                    None => anomalies.push(ClaimAnomaly::MissingPaper {
                        paper_id: paper_id.clone(),
                        subscription_id: subscription.id,
                    }),
                    Some(paper) if !paper.claimed || paper.claimed_by != Some(subscription.id) => {
                        anomalies.push(ClaimAnomaly::UnclaimedBundlePaper {
                            paper_id: paper_id.clone(),
                            subscription_id: subscription.id,
                            claimed_by: paper.claimed_by,
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        for paper in paper_repo.list_claimed(test_type).await? {
            let backed = paper.claimed_by.is_some_and(|holder| {
                bundled_by
                    .get(&paper.id)
                    .is_some_and(|holders| holders.contains(&holder))
            });

            if !backed {
                anomalies.push(ClaimAnomaly::OrphanClaim {
                    paper_id: paper.id,
                    claimed_by: paper.claimed_by,
                });
            }
        }

        for anomaly in &anomalies {
            warn!("Claim audit ({:?}): {}", test_type, anomaly);
        }

        Ok(anomalies)
    }

    async fn load_papers(
        &self,
        test_type: TestType,
        paper_ids: &[String],
    ) -> Result<HashMap<String, SellablePaper>, AppError> {
        let paper_repo = SellablePaperRepository::new(self.db);

        Ok(paper_repo
            .find_many(test_type, paper_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect())
    }

    /// Builds conflict entries for papers already loaded from the catalog.
    async fn conflicts_for(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        papers: &HashMap<String, SellablePaper>,
        exclude: Option<i64>,
    ) -> Result<Vec<PaperConflict>, AppError> {
        let subscription_repo = SubscriptionRepository::new(self.db);

        let holders = subscription_repo
            .find_active_holders(test_type, paper_ids, exclude)
            .await?;

        let mut holders_by_paper: HashMap<&str, Vec<&ActiveHolder>> = HashMap::new();
        for holder in &holders {
            holders_by_paper
                .entry(holder.paper_id.as_str())
                .or_default()
                .push(holder);
        }

        // Claim holders not visible through an active bundle, e.g. a stale claim.
        let ledger_only: Vec<i64> = paper_ids
            .iter()
            .filter(|id| !holders_by_paper.contains_key(id.as_str()))
            .filter_map(|id| papers.get(id.as_str()))
            .filter(|p| p.is_claimed_by_other(exclude))
            .filter_map(|p| p.claimed_by)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let ledger_names = subscription_repo.get_names(&ledger_only).await?;

        let mut conflicts = Vec::new();

        for paper_id in paper_ids {
            if let Some(bundle_holders) = holders_by_paper.get(paper_id.as_str()) {
                if bundle_holders.len() > 1 {
                    let subscription_ids: Vec<i64> =
                        bundle_holders.iter().map(|h| h.subscription_id).collect();

                    warn!(
                        "Paper {} ({:?}) is bundled by multiple active subscriptions {:?}",
                        paper_id, test_type, subscription_ids
                    );

                    return Err(IntegrityError::MultipleClaimants {
                        test_type,
                        paper_id: paper_id.clone(),
                        subscription_ids,
                    }
                    .into());
                }

                // Holders are sorted by subscription ID.
                let holder = bundle_holders[0];
                conflicts.push(PaperConflict {
                    paper_id: paper_id.clone(),
                    subscription_id: Some(holder.subscription_id),
                    subscription_name: Some(holder.subscription_name.clone()),
                });
                continue;
            }

            if let Some(paper) = papers.get(paper_id.as_str()) {
                if paper.is_claimed_by_other(exclude) {
                    conflicts.push(PaperConflict {
                        paper_id: paper_id.clone(),
                        subscription_id: paper.claimed_by,
                        subscription_name: paper
                            .claimed_by
                            .and_then(|id| ledger_names.get(&id).cloned()),
                    });
                }
            }
        }

        if !conflicts.is_empty() {
            warn!(
                "{} {:?} papers are held by other subscriptions",
                conflicts.len(),
                test_type
            );
        }

        Ok(conflicts)
    }
}
