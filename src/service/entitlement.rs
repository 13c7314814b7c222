//! Entitlement engine.
//!
//! Grants time-bounded access to users and resolves which papers a user may open
//! at a given moment.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntitlementKind, TestType};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::{
    data::{
        entitlement::EntitlementRepository, sequence::SequenceRepository,
        subscription::SubscriptionRepository, test_series::TestSeriesRepository,
    },
    error::{entitlement::EntitlementError, validation::ValidationError, AppError},
    model::{
        entitlement::{AccessiblePaper, Entitlement, GrantOutcome, GrantParams, NewEntitlement},
        sequence::SequenceCategory,
        subscription::{ClassificationFilter, Subscription},
    },
};

/// Most grants returned by [`EntitlementService::resolve_recent`].
const RECENT_LIMIT: u64 = 2;

pub struct EntitlementService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EntitlementService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Grants a user access under a subscription.
    ///
    /// The subscription must be ACTIVE, unexpired and bundle at least one paper.
    /// DAY grants name a paper from the bundle; a user cannot hold two live DAY
    /// grants for the same paper under one subscription, and a live broader grant
    /// for the same subscription already covers any DAY request.
    ///
    /// # Returns
    /// - `Ok(GrantOutcome::Created)` - New entitlement persisted
    /// - `Ok(GrantOutcome::AlreadyCovered)` - A live broader grant covers the request
    /// - `Err(EntitlementError::SubscriptionUnavailable)` - Subscription cannot grant access
    /// - `Err(EntitlementError::DuplicateDayGrant)` - Live DAY grant for the paper exists
    /// - `Err(AppError::Validation)` - Bad window or paper parameters
    pub async fn grant(
        &self,
        params: GrantParams,
        now: DateTime<Utc>,
    ) -> Result<GrantOutcome, AppError> {
        let entitlement_repo = EntitlementRepository::new(self.db);

        let subscription = SubscriptionRepository::new(self.db)
            .get_by_id(params.subscription_id)
            .await?
            .filter(|s| s.is_available(now))
            .ok_or(EntitlementError::SubscriptionUnavailable {
                subscription_id: params.subscription_id,
            })?;

        if params.window.valid_until <= params.window.valid_from {
            return Err(ValidationError::InvalidWindow.into());
        }

        if params.kind == EntitlementKind::Day {
            let paper_id = params
                .paper_id
                .as_deref()
                .ok_or(ValidationError::DayGrantRequiresPaper)?;

            if !subscription.paper_ids.iter().any(|p| p == paper_id) {
                return Err(ValidationError::PaperNotInBundle {
                    subscription_id: subscription.id,
                    paper_id: paper_id.to_string(),
                }
                .into());
            }

            let live = entitlement_repo
                .find_live_for_subscription(&params.user_id, subscription.id, now)
                .await?;

            if let Some(broader) = live.iter().find(|e| e.kind.is_broad()) {
                info!(
                    "DAY grant for user {} on paper {} already covered by entitlement {}",
                    params.user_id, paper_id, broader.id
                );
                return Ok(GrantOutcome::AlreadyCovered(broader.clone()));
            }

            if let Some(existing) = live
                .iter()
                .find(|e| e.kind == EntitlementKind::Day && e.paper_id.as_deref() == Some(paper_id))
            {
                return Err(EntitlementError::DuplicateDayGrant {
                    user_id: params.user_id,
                    paper_id: paper_id.to_string(),
                    entitlement_id: existing.id,
                }
                .into());
            }
        } else if params.paper_id.is_some() {
            return Err(ValidationError::PaperIdNotAllowed { kind: params.kind }.into());
        }

        let id = SequenceRepository::new(self.db)
            .next(SequenceCategory::Entitlement.as_str())
            .await?;

        let entitlement = entitlement_repo
            .create(NewEntitlement {
                id,
                user_id: params.user_id,
                subscription_id: subscription.id,
                kind: params.kind,
                paper_id: params.paper_id,
                window: params.window,
            })
            .await?;

        info!(
            "Granted {:?} entitlement {} on subscription {} to user {}",
            entitlement.kind, entitlement.id, entitlement.subscription_id, entitlement.user_id
        );

        Ok(GrantOutcome::Created(entitlement))
    }

    /// Revokes a grant by clearing its active flag.
    ///
    /// The row is kept so purchases and attempts can still refer to it, but the
    /// grant stops being live and no longer appears among recent grants.
    /// Revoking an inactive grant is a no-op.
    ///
    /// # Returns
    /// - `Ok(Entitlement)` - The grant, now inactive
    /// - `Err(AppError::NotFound)` - No such grant
    pub async fn revoke(&self, id: i64) -> Result<Entitlement, AppError> {
        let repo = EntitlementRepository::new(self.db);

        let entitlement = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entitlement {} not found", id)))?;

        if !entitlement.active {
            warn!("Entitlement {} is already revoked", id);
            return Ok(entitlement);
        }

        repo.deactivate(id).await?;

        info!(
            "Revoked {:?} entitlement {} of user {} on subscription {}",
            entitlement.kind, entitlement.id, entitlement.user_id, entitlement.subscription_id
        );

        Ok(Entitlement {
            active: false,
            ..entitlement
        })
    }

    /// Gets the user's live grants, oldest first, whose subscription matches the
    /// filter.
    pub async fn resolve_live(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        filter: &ClassificationFilter,
    ) -> Result<Vec<Entitlement>, AppError> {
        let live = EntitlementRepository::new(self.db)
            .find_live(user_id, now)
            .await?;

        if filter.is_empty() {
            return Ok(live);
        }

        let subscriptions = self.subscriptions_for(&live).await?;

        Ok(live
            .into_iter()
            .filter(|e| {
                subscriptions
                    .get(&e.subscription_id)
                    .is_some_and(|s| filter.matches(&s.classification))
            })
            .collect())
    }

    /// Expands the user's live grants into the papers they may open.
    ///
    /// DAY grants cover their paper, SUBSCRIPTION and FREE_SUBSCRIPTION grants the
    /// whole bundle, TEST_SERIES grants the series listing. A paper covered by
    /// several grants appears once, in the position of its first appearance when
    /// grants are walked oldest first, carrying the window of the most recently
    /// created grant covering it.
    pub async fn resolve_accessible_papers(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        filter: &ClassificationFilter,
    ) -> Result<Vec<AccessiblePaper>, AppError> {
        let test_series_repo = TestSeriesRepository::new(self.db);

        let live = EntitlementRepository::new(self.db)
            .find_live(user_id, now)
            .await?;
        let subscriptions = self.subscriptions_for(&live).await?;

        let mut series_listings: HashMap<i64, Vec<String>> = HashMap::new();
        let mut papers: Vec<AccessiblePaper> = Vec::new();
        let mut positions: HashMap<(TestType, String), usize> = HashMap::new();

        for grant in live {
            let Some(subscription) = subscriptions.get(&grant.subscription_id) else {
                warn!(
                    "Entitlement {} references missing subscription {}",
                    grant.id, grant.subscription_id
                );
                continue;
            };

            if !filter.matches(&subscription.classification) {
                continue;
            }

            let covered: Vec<String> = match grant.kind {
                EntitlementKind::Day => grant.paper_id.iter().cloned().collect(),
                EntitlementKind::Subscription | EntitlementKind::FreeSubscription => {
                    subscription.paper_ids.clone()
                }
                EntitlementKind::TestSeries => {
                    if !series_listings.contains_key(&subscription.id) {
                        let listing = test_series_repo.paper_ids(subscription.id).await?;
                        series_listings.insert(subscription.id, listing);
                    }
                    series_listings
                        .get(&subscription.id)
                        .cloned()
                        .unwrap_or_default()
                }
            };

            let test_type = subscription.classification.test_type;

            for paper_id in covered {
                let accessible = AccessiblePaper {
                    test_type,
                    paper_id: paper_id.clone(),
                    subscription_id: grant.subscription_id,
                    entitlement_id: grant.id,
                    kind: grant.kind,
                    window: grant.window,
                };

                match positions.get(&(test_type, paper_id.clone())) {
                    // Grants are walked oldest first, so the later grant wins.
                    Some(&index) => papers[index] = accessible,
                    None => {
                        positions.insert((test_type, paper_id), papers.len());
                        papers.push(accessible);
                    }
                }
            }
        }

        Ok(papers)
    }

    /// Gets up to two of the user's most recently created active grants, live or
    /// expired, newest first.
    pub async fn resolve_recent(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        filter: &ClassificationFilter,
    ) -> Result<Vec<Entitlement>, AppError> {
        let repo = EntitlementRepository::new(self.db);

        if filter.is_empty() {
            return Ok(repo.find_recent(user_id, now, Some(RECENT_LIMIT)).await?);
        }

        let recent = repo.find_recent(user_id, now, None).await?;

        let subscriptions = self.subscriptions_for(&recent).await?;

        Ok(recent
            .into_iter()
            .filter(|e| {
                subscriptions
                    .get(&e.subscription_id)
                    .is_some_and(|s| filter.matches(&s.classification))
            })
            .take(RECENT_LIMIT as usize)
            .collect())
    }

    async fn subscriptions_for(
        &self,
        entitlements: &[Entitlement],
    ) -> Result<HashMap<i64, Subscription>, AppError> {
        let mut ids: Vec<i64> = entitlements.iter().map(|e| e.subscription_id).collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(SubscriptionRepository::new(self.db).get_many(&ids).await?)
    }
}
