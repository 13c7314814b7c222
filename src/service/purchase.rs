//! Purchase recorder.
//!
//! Records what a user bought and grants the matching entitlement. There is no
//! payment gateway: a purchase completes when its grant is persisted.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{CommerceType, EntitlementKind, PurchaseStatus};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::{
    data::{
        purchase::PurchaseRepository, sequence::SequenceRepository,
        subscription::SubscriptionRepository,
    },
    error::{
        entitlement::EntitlementError, internal::InternalError, validation::ValidationError,
        AppError,
    },
    model::{
        entitlement::{GrantOutcome, GrantParams, ValidityWindow},
        purchase::{NewPurchase, Purchase, PurchaseParams},
        sequence::SequenceCategory,
    },
    service::entitlement::EntitlementService,
};

pub struct PurchaseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PurchaseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Buys access to a subscription.
    ///
    /// PAID subscriptions sell the kinds they have a price for; FREE subscriptions
    /// only sell FREE_SUBSCRIPTION at no cost, valid until the subscription
    /// deadline. A paid window lasts the tier's duration, capped at the deadline.
    ///
    /// The purchase is recorded as PENDING before the grant. A successful grant
    /// completes it and adds the sale to the subscription's subscriber count and
    /// revenue; any grant failure marks it FAILED and returns the error.
    ///
    /// # Returns
    /// - `Ok(Purchase)` - The COMPLETED purchase
    /// - `Err(EntitlementError::SubscriptionUnavailable)` - Subscription cannot be bought
    /// - `Err(ValidationError::KindNotSold)` - No price for the requested kind
    /// - `Err(EntitlementError::AlreadyCovered)` - A live broader grant already covers a DAY purchase
    pub async fn purchase(
        &self,
        params: PurchaseParams,
        now: DateTime<Utc>,
    ) -> Result<Purchase, AppError> {
        let purchase_repo = PurchaseRepository::new(self.db);
        let subscription_repo = SubscriptionRepository::new(self.db);

        let subscription = subscription_repo
            .get_by_id(params.subscription_id)
            .await?
            .filter(|s| s.is_available(now))
            .ok_or(EntitlementError::SubscriptionUnavailable {
                subscription_id: params.subscription_id,
            })?;

        let (amount_minor, valid_until) = match subscription.classification.commerce_type {
            CommerceType::Free => {
                if params.kind != EntitlementKind::FreeSubscription {
                    return Err(ValidationError::KindNotSold {
                        subscription_id: subscription.id,
                        kind: params.kind,
                    }
                    .into());
                }
                (0, subscription.validity)
            }
            CommerceType::Paid => {
                let tier =
                    subscription
                        .price_for(params.kind)
                        .ok_or(ValidationError::KindNotSold {
                            subscription_id: subscription.id,
                            kind: params.kind,
                        })?;

                let until = Duration::try_days(i64::from(tier.duration_days))
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or(InternalError::DateOverflow { from: now })?;

                (tier.amount_minor, until.min(subscription.validity))
            }
        };

        let window = ValidityWindow::new(now, valid_until)?;

        let id = SequenceRepository::new(self.db)
            .next(SequenceCategory::Purchase.as_str())
            .await?;

        purchase_repo
            .create(NewPurchase {
                id,
                user_id: params.user_id.clone(),
                subscription_id: subscription.id,
                kind: params.kind,
                paper_id: params.paper_id.clone(),
                amount_minor,
                now,
            })
            .await?;

        let outcome = EntitlementService::new(self.db)
            .grant(
                GrantParams {
                    user_id: params.user_id.clone(),
                    subscription_id: subscription.id,
                    kind: params.kind,
                    window,
                    paper_id: params.paper_id,
                },
                now,
            )
            .await;

        match outcome {
            Ok(GrantOutcome::Created(entitlement)) => {
                purchase_repo
                    .set_outcome(id, PurchaseStatus::Completed, Some(entitlement.id), now)
                    .await?;
                subscription_repo
                    .record_sale(subscription.id, amount_minor, now)
                    .await?;

                info!(
                    "Purchase {} completed: user {} bought {:?} on subscription {} for {}",
                    id, params.user_id, params.kind, subscription.id, amount_minor
                );
            }
            Ok(GrantOutcome::AlreadyCovered(entitlement)) => {
                purchase_repo
                    .set_outcome(id, PurchaseStatus::Failed, None, now)
                    .await?;

                warn!(
                    "Purchase {} failed: user {} is already covered by entitlement {}",
                    id, params.user_id, entitlement.id
                );

                return Err(EntitlementError::AlreadyCovered {
                    entitlement_id: entitlement.id,
                }
                .into());
            }
            Err(err) => {
                purchase_repo
                    .set_outcome(id, PurchaseStatus::Failed, None, now)
                    .await?;

                warn!("Purchase {} failed: {}", id, err);

                return Err(err);
            }
        }

        self.get_by_id(id).await?.ok_or_else(|| {
            InternalError::MissingAfterWrite {
                entity: "Purchase",
                key: id.to_string(),
            }
            .into()
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Purchase>, AppError> {
        Ok(PurchaseRepository::new(self.db).get_by_id(id).await?)
    }
}
