//! Subscription factory for creating test subscriptions with bundle and pricing rows.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{CommerceType, EntitlementKind, SubscriptionState, TestType};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{fixed_now, millis, next_id, next_record_id};

/// Factory for creating test subscriptions.
///
/// Bundle rows are written in the order given to `papers()`. Catalog papers are not
/// created or claimed; use the paper factory or
/// [`create_active_subscription`](crate::factory::helpers::create_active_subscription)
/// for that.
///
/// # Example
///
/// ```rust,ignore
/// let subscription = SubscriptionFactory::new(&db, TestType::Paid)
///     .papers(["P1", "P2"])
///     .state(SubscriptionState::Active)
///     .build()
///     .await?;
/// ```
pub struct SubscriptionFactory<'a> {
    db: &'a DatabaseConnection,
    id: i64,
    name: String,
    test_type: TestType,
    category: String,
    sub_category: String,
    commerce_type: CommerceType,
    state: SubscriptionState,
    validity: DateTime<Utc>,
    papers: Vec<String>,
    prices: Vec<(EntitlementKind, i64, i32)>,
    subscriber_count: i32,
    revenue_minor: i64,
}

impl<'a> SubscriptionFactory<'a> {
    /// Creates a new SubscriptionFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Subscription {n}"` where n is auto-incremented
    /// - category `"BANKING"`, sub-category `"PO"`, PAID, DRAFT
    /// - validity 30 days after [`fixed_now`]
    /// - no papers, a SUBSCRIPTION price of 49 900 for 30 days
    pub fn new(db: &'a DatabaseConnection, test_type: TestType) -> Self {
        Self {
            db,
            id: next_record_id(),
            name: format!("Subscription {}", next_id()),
            test_type,
            category: "BANKING".to_string(),
            sub_category: "PO".to_string(),
            commerce_type: CommerceType::Paid,
            state: SubscriptionState::Draft,
            validity: fixed_now() + Duration::days(30),
            papers: Vec::new(),
            prices: vec![(EntitlementKind::Subscription, 49_900, 30)],
            subscriber_count: 0,
            revenue_minor: 0,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
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

    /// Sets the commerce type. FREE subscriptions start without pricing rows.
    pub fn commerce_type(mut self, commerce_type: CommerceType) -> Self {
        self.commerce_type = commerce_type;
        if commerce_type == CommerceType::Free {
            self.prices.clear();
        }
        self
    }

    pub fn state(mut self, state: SubscriptionState) -> Self {
        self.state = state;
        self
    }

    pub fn validity(mut self, validity: DateTime<Utc>) -> Self {
        self.validity = validity;
        self
    }

    /// Sets the bundle in order.
    pub fn papers<I, S>(mut self, paper_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.papers = paper_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Adds or replaces the price for an entitlement kind.
    pub fn price(mut self, kind: EntitlementKind, amount_minor: i64, duration_days: i32) -> Self {
        self.prices.retain(|(k, _, _)| *k != kind);
        self.prices.push((kind, amount_minor, duration_days));
        self
    }

    pub fn subscriber_count(mut self, subscriber_count: i32) -> Self {
        self.subscriber_count = subscriber_count;
        self
    }

    /// Builds and inserts the subscription with its bundle and pricing rows.
    ///
    /// # Returns
    /// - `Ok(entity::subscription::Model)` - Created subscription
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::subscription::Model, DbErr> {
        let now = millis(fixed_now());
        let active_date = (self.state == SubscriptionState::Active).then_some(now);

        let subscription = entity::subscription::ActiveModel {
            id: ActiveValue::Set(self.id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            test_type: ActiveValue::Set(self.test_type),
            category: ActiveValue::Set(self.category),
            sub_category: ActiveValue::Set(self.sub_category),
            commerce_type: ActiveValue::Set(self.commerce_type),
            state: ActiveValue::Set(self.state),
            validity: ActiveValue::Set(millis(self.validity)),
            created_date: ActiveValue::Set(now),
            active_date: ActiveValue::Set(active_date),
            updated_date: ActiveValue::Set(now),
            subscriber_count: ActiveValue::Set(self.subscriber_count),
            revenue_minor: ActiveValue::Set(self.revenue_minor),
        }
        .insert(self.db)
        .await?;

        for (position, paper_id) in self.papers.into_iter().enumerate() {
            entity::subscription_paper::ActiveModel {
                subscription_id: ActiveValue::Set(subscription.id),
                paper_id: ActiveValue::Set(paper_id),
                test_type: ActiveValue::Set(subscription.test_type),
                position: ActiveValue::Set(position as i32),
            }
            .insert(self.db)
            .await?;
        }

        for (kind, amount_minor, duration_days) in self.prices {
            entity::subscription_price::ActiveModel {
                subscription_id: ActiveValue::Set(subscription.id),
                kind: ActiveValue::Set(kind),
                amount_minor: ActiveValue::Set(amount_minor),
                duration_days: ActiveValue::Set(duration_days),
            }
            .insert(self.db)
            .await?;
        }

        Ok(subscription)
    }
}

/// Creates a DRAFT subscription bundling the given papers.
pub async fn create_subscription<I, S>(
    db: &DatabaseConnection,
    test_type: TestType,
    paper_ids: I,
) -> Result<entity::subscription::Model, DbErr>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SubscriptionFactory::new(db, test_type)
        .papers(paper_ids)
        .build()
        .await
}
