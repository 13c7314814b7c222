//! Subscription domain models and parameters.
//!
//! A subscription bundles an ordered set of sellable papers of one test type and
//! sells access to them. Includes the classification used to filter subscriptions
//! and entitlements, pricing tiers, lifecycle transition checks, and the parameter
//! types for create and update operations.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{CommerceType, EntitlementKind, SubscriptionState, TestType};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::HashSet;

use crate::{
    error::{subscription::SubscriptionError, validation::ValidationError},
    util::time::{from_millis, from_millis_opt},
};

/// Catalog classification shared by a subscription and the papers it bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Paper catalog the bundled papers come from.
    pub test_type: TestType,
    pub category: String,
    pub sub_category: String,
    /// Whether access is sold or given away.
    pub commerce_type: CommerceType,
}

/// Optional classification constraints; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationFilter {
    pub test_type: Option<TestType>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub commerce_type: Option<CommerceType>,
}

impl ClassificationFilter {
    /// Filter restricted to a single test type.
    pub fn test_type(test_type: TestType) -> Self {
        Self {
            test_type: Some(test_type),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.test_type.is_none()
            && self.category.is_none()
            && self.sub_category.is_none()
            && self.commerce_type.is_none()
    }

    /// Checks every set constraint against a classification.
    pub fn matches(&self, classification: &Classification) -> bool {
        self.test_type.is_none_or(|t| t == classification.test_type)
            && self
                .category
                .as_ref()
                .is_none_or(|c| *c == classification.category)
            && self
                .sub_category
                .as_ref()
                .is_none_or(|s| *s == classification.sub_category)
            && self
                .commerce_type
                .is_none_or(|c| c == classification.commerce_type)
    }
}

/// Price of one entitlement kind for a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub kind: EntitlementKind,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Length of the access window granted by a purchase.
    pub duration_days: i32,
}

impl PriceTier {
    pub fn from_entity(entity: entity::subscription_price::Model) -> Self {
        Self {
            kind: entity.kind,
            amount_minor: entity.amount_minor,
            duration_days: entity.duration_days,
        }
    }
}

/// Subscription with its bundle and pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub classification: Classification,
    /// Bundled paper IDs in bundle order.
    pub paper_ids: Vec<String>,
    pub state: SubscriptionState,
    /// Deadline after which the subscription can no longer grant access.
    pub validity: DateTime<Utc>,
    pub pricing: Vec<PriceTier>,
    pub created_at: DateTime<Utc>,
    /// When the subscription was last activated.
    pub active_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Cached count of completed purchases.
    pub subscriber_count: i32,
    /// Cached revenue in minor currency units.
    pub revenue_minor: i64,
}

impl Subscription {
    /// Converts entity models to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The subscription row
    /// - `papers` - Bundle rows for this subscription, in any order
    /// - `prices` - Pricing rows for this subscription
    ///
    /// # Returns
    /// - `Ok(Subscription)` - Converted model with the bundle sorted by position
    /// - `Err(DbErr::Custom)` - A stored timestamp could not be converted
    pub fn from_entity(
        entity: entity::subscription::Model,
        mut papers: Vec<entity::subscription_paper::Model>,
        prices: Vec<entity::subscription_price::Model>,
    ) -> Result<Self, DbErr> {
        papers.sort_by_key(|p| p.position);

        Ok(Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            classification: Classification {
                test_type: entity.test_type,
                category: entity.category,
                sub_category: entity.sub_category,
                commerce_type: entity.commerce_type,
            },
            paper_ids: papers.into_iter().map(|p| p.paper_id).collect(),
            state: entity.state,
            validity: from_millis(entity.validity)?,
            pricing: prices.into_iter().map(PriceTier::from_entity).collect(),
            created_at: from_millis(entity.created_date)?,
            active_at: from_millis_opt(entity.active_date)?,
            updated_at: from_millis(entity.updated_date)?,
            subscriber_count: entity.subscriber_count,
            revenue_minor: entity.revenue_minor,
        })
    }

    pub fn price_for(&self, kind: EntitlementKind) -> Option<&PriceTier> {
        self.pricing.iter().find(|p| p.kind == kind)
    }

    /// Whether new entitlements may reference this subscription at `now`.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.state == SubscriptionState::Active && !self.paper_ids.is_empty() && self.validity >= now
    }
}

/// Parameters for defining a new subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionParams {
    pub name: String,
    pub description: Option<String>,
    pub classification: Classification,
    /// Papers to bundle; duplicates collapse to their first position.
    pub paper_ids: Vec<String>,
    pub validity: DateTime<Utc>,
    pub pricing: Vec<PriceTier>,
    /// Claim the papers and persist as ACTIVE in one call.
    pub activate_immediately: bool,
}

impl CreateSubscriptionParams {
    /// Checks required fields before any store access.
    ///
    /// # Returns
    /// - `Ok(())` - Definition is complete
    /// - `Err(ValidationError)` - First failing rule
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.classification.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        if self.classification.sub_category.trim().is_empty() {
            return Err(ValidationError::MissingField("sub_category"));
        }
        if self.paper_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ValidationError::EmptyBundle);
        }
        if self.validity <= now {
            return Err(ValidationError::ValidityNotInFuture {
                validity: self.validity,
            });
        }
        if self.classification.commerce_type == CommerceType::Paid && self.pricing.is_empty() {
            return Err(ValidationError::MissingPricing);
        }
        if let Some(tier) = self
            .pricing
            .iter()
            .find(|t| t.amount_minor < 0 || t.duration_days <= 0)
        {
            return Err(ValidationError::InvalidPricing { kind: tier.kind });
        }
        if let Some((_, tier)) = self
            .pricing
            .iter()
            .enumerate()
            .find(|(i, t)| self.pricing[..*i].iter().any(|p| p.kind == t.kind))
        {
            return Err(ValidationError::InvalidPricing { kind: tier.kind });
        }

        Ok(())
    }
}

/// Row data handed to the repository when persisting a new subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub classification: Classification,
    pub paper_ids: Vec<String>,
    pub validity: DateTime<Utc>,
    pub pricing: Vec<PriceTier>,
    pub state: SubscriptionState,
    pub active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// How to move a subscription's validity deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityExtension {
    /// Replace the deadline.
    Until(DateTime<Utc>),
    /// Add days to the current deadline.
    ByDays(i64),
}

impl ValidityExtension {
    /// Computes the new deadline; `None` when the date arithmetic overflows.
    pub fn apply(self, current: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Until(at) => Some(at),
            Self::ByDays(days) => {
                Duration::try_days(days).and_then(|d| current.checked_add_signed(d))
            }
        }
    }
}

/// A paper that cannot be claimed, with the subscription holding it when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperConflict {
    pub paper_id: String,
    pub subscription_id: Option<i64>,
    pub subscription_name: Option<String>,
}

/// Page of subscriptions with pagination metadata.
#[derive(Debug, Clone)]
pub struct PaginatedSubscriptions {
    pub subscriptions: Vec<Subscription>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Checks a subscription state transition.
///
/// DRAFT and ACTIVE only move to each other; requesting the current state is a
/// conflict.
///
/// # Returns
/// - `Ok(SubscriptionState)` - The target state
/// - `Err(SubscriptionError::AlreadyActive | AlreadyDraft)` - Already in `to`
pub fn transition(
    subscription_id: i64,
    from: SubscriptionState,
    to: SubscriptionState,
) -> Result<SubscriptionState, SubscriptionError> {
    match (from, to) {
        (SubscriptionState::Draft, SubscriptionState::Active) => Ok(to),
        (SubscriptionState::Active, SubscriptionState::Draft) => Ok(to),
        (SubscriptionState::Active, SubscriptionState::Active) => {
            Err(SubscriptionError::AlreadyActive(subscription_id))
        }
        (SubscriptionState::Draft, SubscriptionState::Draft) => {
            Err(SubscriptionError::AlreadyDraft(subscription_id))
        }
    }
}

/// Removes blank and repeated paper IDs, keeping first occurrences in order.
pub fn dedupe_paper_ids(paper_ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    paper_ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}
