//! Subscription lifecycle.
//!
//! Subscriptions move between DRAFT and ACTIVE. Activation claims every bundled
//! paper in the ledger and deactivation releases them, so an ACTIVE subscription
//! always holds its whole bundle and no other ACTIVE subscription holds any of it.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{SubscriptionState, TestType};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashSet;
use tracing::{error, info};

use crate::{
    data::{sequence::SequenceRepository, subscription::SubscriptionRepository},
    error::{
        internal::InternalError, subscription::SubscriptionError, validation::ValidationError,
        AppError,
    },
    model::{
        sequence::SequenceCategory,
        subscription::{
            dedupe_paper_ids, transition, ClassificationFilter, CreateSubscriptionParams,
            NewSubscription, PaginatedSubscriptions, Subscription, ValidityExtension,
        },
    },
    service::ledger::LedgerService,
};

pub struct SubscriptionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a subscription as DRAFT, or as ACTIVE when requested.
    ///
    /// Duplicate paper IDs collapse to their first position. Every paper must exist
    /// in the catalog of the subscription's test type and must not be held by
    /// another subscription. When activating immediately, papers are claimed before
    /// the subscription is persisted and released again if persisting fails.
    ///
    /// # Arguments
    /// - `params` - Subscription definition
    /// - `now` - Current time, used for validation and timestamps
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The persisted subscription
    /// - `Err(AppError::Validation)` - Definition is incomplete
    /// - `Err(AppError::NotFound)` - A paper is missing from the catalog
    /// - `Err(AppError::Subscription)` - Papers are held by other subscriptions
    pub async fn create(
        &self,
        params: CreateSubscriptionParams,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        params.validate(now)?;

        let ledger = LedgerService::new(self.db);
        let test_type = params.classification.test_type;
        let paper_ids = dedupe_paper_ids(params.paper_ids);

        let conflicts = ledger
            .check_availability(test_type, &paper_ids, None)
            .await?;
        if !conflicts.is_empty() {
            return Err(SubscriptionError::PapersClaimed { conflicts }.into());
        }

        let id = SequenceRepository::new(self.db)
            .next(SequenceCategory::Subscription.as_str())
            .await?;

        let (state, active_at) = if params.activate_immediately {
            ledger.claim_all(test_type, &paper_ids, id).await?;
            (SubscriptionState::Active, Some(now))
        } else {
            (SubscriptionState::Draft, None)
        };

        let new_subscription = NewSubscription {
            id,
            name: params.name,
            description: params.description,
            classification: params.classification,
            paper_ids: paper_ids.clone(),
            validity: params.validity,
            pricing: params.pricing,
            state,
            active_at,
            created_at: now,
        };

        match SubscriptionRepository::new(self.db)
            .create(new_subscription)
            .await
        {
            Ok(subscription) => {
                info!(
                    "Created subscription {} '{}' as {:?} with {} papers",
                    subscription.id,
                    subscription.name,
                    subscription.state,
                    subscription.paper_ids.len()
                );
                Ok(subscription)
            }
            Err(err) => {
                if state == SubscriptionState::Active {
                    error!(
                        "Failed to persist subscription {}; releasing its claims: {}",
                        id, err
                    );
                    ledger.release_all(test_type, &paper_ids, id).await?;
                }
                Err(err.into())
            }
        }
    }

    /// Activates a DRAFT subscription.
    ///
    /// Availability is re-checked against the current ledger and every conflicting
    /// paper is reported. A failed activation leaves the subscription in DRAFT with
    /// no claims.
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The activated subscription
    /// - `Err(AppError::NotFound)` - No such subscription
    /// - `Err(SubscriptionError::AlreadyActive)` - Already ACTIVE
    /// - `Err(SubscriptionError::PapersClaimed)` - Papers are held elsewhere
    /// - `Err(AppError::Integrity)` - A paper has several active holders
    pub async fn activate(&self, id: i64, now: DateTime<Utc>) -> Result<Subscription, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let ledger = LedgerService::new(self.db);

        let subscription = self.require(id).await?;
        transition(id, subscription.state, SubscriptionState::Active)?;

        if subscription.paper_ids.is_empty() {
            return Err(ValidationError::EmptyBundle.into());
        }

        let test_type = subscription.classification.test_type;

        let conflicts = ledger
            .check_availability(test_type, &subscription.paper_ids, Some(id))
            .await?;
        if !conflicts.is_empty() {
            return Err(SubscriptionError::PapersClaimed { conflicts }.into());
        }

        ledger
            .claim_all(test_type, &subscription.paper_ids, id)
            .await?;

        if let Err(err) = repo
            .set_state(id, SubscriptionState::Active, Some(now), now)
            .await
        {
            error!(
                "Failed to mark subscription {} active; releasing its claims: {}",
                id, err
            );
            ledger
                .release_all(test_type, &subscription.paper_ids, id)
                .await?;
            return Err(err.into());
        }

        info!("Activated subscription {} '{}'", id, subscription.name);

        self.reload(id).await
    }

    /// Returns an ACTIVE subscription to DRAFT and releases its claims.
    ///
    /// The state change and the release commit together, so a failure leaves the
    /// subscription ACTIVE with its claims intact.
    ///
    /// # Arguments
    /// - `id` - Subscription to deactivate
    /// - `force` - Deactivate even when the subscription has subscribers
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The subscription in DRAFT
    /// - `Err(SubscriptionError::AlreadyDraft)` - Already DRAFT
    /// - `Err(SubscriptionError::ActiveSubscribers)` - Has subscribers and `force` is false
    pub async fn deactivate(
        &self,
        id: i64,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let subscription = self.require(id).await?;
        transition(id, subscription.state, SubscriptionState::Draft)?;

        if subscription.subscriber_count > 0 && !force {
            return Err(SubscriptionError::ActiveSubscribers {
                subscription_id: id,
                subscriber_count: subscription.subscriber_count,
            }
            .into());
        }

        let txn = self.db.begin().await?;

        SubscriptionRepository::new(&txn)
            .set_state(id, SubscriptionState::Draft, None, now)
            .await?;
        LedgerService::new(&txn)
            .release_all(
                subscription.classification.test_type,
                &subscription.paper_ids,
                id,
            )
            .await?;

        txn.commit().await?;

        info!(
            "Deactivated subscription {} '{}' (force: {}, subscribers: {})",
            id, subscription.name, force, subscription.subscriber_count
        );

        self.reload(id).await
    }

    /// Replaces the bundle of a subscription.
    ///
    /// Added papers go through the availability check. An ACTIVE subscription
    /// claims the added papers first, then swaps the bundle and releases the
    /// removed papers in one transaction; if that fails the added claims are
    /// released again. A DRAFT subscription only swaps the bundle.
    pub async fn update_papers(
        &self,
        id: i64,
        paper_ids: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let ledger = LedgerService::new(self.db);

        let subscription = self.require(id).await?;
        let test_type = subscription.classification.test_type;

        let paper_ids = dedupe_paper_ids(paper_ids);
        if paper_ids.is_empty() {
            return Err(ValidationError::EmptyBundle.into());
        }

        let current: HashSet<&String> = subscription.paper_ids.iter().collect();
        let requested: HashSet<&String> = paper_ids.iter().collect();

        let added: Vec<String> = paper_ids
            .iter()
            .filter(|p| !current.contains(p))
            .cloned()
            .collect();
        let removed: Vec<String> = subscription
            .paper_ids
            .iter()
            .filter(|p| !requested.contains(p))
            .cloned()
            .collect();

        if !added.is_empty() {
            let conflicts = ledger
                .check_availability(test_type, &added, Some(id))
                .await?;
            if !conflicts.is_empty() {
                return Err(SubscriptionError::PapersClaimed { conflicts }.into());
            }
        }

        if subscription.state == SubscriptionState::Active {
            ledger.claim_all(test_type, &added, id).await?;

            if let Err(err) = self
                .swap_bundle(id, test_type, &paper_ids, &removed, now)
                .await
            {
                error!(
                    "Failed to update bundle of subscription {}; releasing added claims: {}",
                    id, err
                );
                ledger.release_all(test_type, &added, id).await?;
                return Err(err);
            }
        } else {
            repo.replace_papers(id, test_type, &paper_ids, now).await?;
        }

        info!(
            "Updated bundle of subscription {}: {} added, {} removed",
            id,
            added.len(),
            removed.len()
        );

        self.reload(id).await
    }

    /// Deletes a DRAFT subscription.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let subscription = self.require(id).await?;

        if subscription.state == SubscriptionState::Active {
            return Err(SubscriptionError::DeleteWhileActive(id).into());
        }

        SubscriptionRepository::new(self.db).delete(id).await?;

        info!("Deleted subscription {} '{}'", id, subscription.name);

        Ok(())
    }

    /// Moves the validity deadline.
    ///
    /// # Returns
    /// - `Ok(Subscription)` - Subscription with the new deadline
    /// - `Err(ValidationError::ValidityNotInFuture)` - Resulting deadline is not after `now`
    pub async fn extend_validity(
        &self,
        id: i64,
        extension: ValidityExtension,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let subscription = self.require(id).await?;

        let validity =
            extension
                .apply(subscription.validity)
                .ok_or(InternalError::DateOverflow {
                    from: subscription.validity,
                })?;

        if validity <= now {
            return Err(ValidationError::ValidityNotInFuture { validity }.into());
        }

        SubscriptionRepository::new(self.db)
            .set_validity(id, validity, now)
            .await?;

        self.reload(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, AppError> {
        Ok(SubscriptionRepository::new(self.db).get_by_id(id).await?)
    }

    /// Gets a page of subscriptions matching a classification filter and optional
    /// state. `page` is zero-based.
    pub async fn get_paginated(
        &self,
        filter: &ClassificationFilter,
        state: Option<SubscriptionState>,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedSubscriptions, AppError> {
        let repo = SubscriptionRepository::new(self.db);

        let (subscriptions, total) = repo.get_paginated(filter, state, page, per_page).await?;

        let total_pages = if per_page > 0 {
            (total as f64 / per_page as f64).ceil() as u64
        } else {
            0
        };

        Ok(PaginatedSubscriptions {
            subscriptions,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Replaces the bundle and releases the removed papers in one transaction.
    async fn swap_bundle(
        &self,
        id: i64,
        test_type: TestType,
        paper_ids: &[String],
        removed: &[String],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        SubscriptionRepository::new(&txn)
            .replace_papers(id, test_type, paper_ids, now)
            .await?;
        LedgerService::new(&txn)
            .release_all(test_type, removed, id)
            .await?;

        txn.commit().await?;

        Ok(())
    }

    async fn require(&self, id: i64) -> Result<Subscription, AppError> {
        SubscriptionRepository::new(self.db)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscription {} not found", id)))
    }

    async fn reload(&self, id: i64) -> Result<Subscription, AppError> {
        SubscriptionRepository::new(self.db)
            .get_by_id(id)
            .await?
            .ok_or_else(|| {
                InternalError::MissingAfterWrite {
                    entity: "Subscription",
                    key: id.to_string(),
                }
                .into()
            })
    }
}
