//! Entitlement factory for creating test grants.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::EntitlementKind;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{fixed_now, millis, next_record_id};

/// Factory for creating test entitlements.
///
/// # Example
///
/// ```rust,ignore
/// let grant = EntitlementFactory::new(&db, "user-1", subscription.id)
///     .kind(EntitlementKind::Day)
///     .paper_id("P1")
///     .build()
///     .await?;
/// ```
pub struct EntitlementFactory<'a> {
    db: &'a DatabaseConnection,
    id: i64,
    user_id: String,
    subscription_id: i64,
    kind: EntitlementKind,
    paper_id: Option<String>,
    created_date: DateTime<Utc>,
    validity: DateTime<Utc>,
    active: bool,
}

impl<'a> EntitlementFactory<'a> {
    /// Creates a new EntitlementFactory with default values.
    ///
    /// Defaults:
    /// - kind SUBSCRIPTION, no paper, active
    /// - window from a day before [`fixed_now`] to 30 days after it
    pub fn new(
        db: &'a DatabaseConnection,
        user_id: impl Into<String>,
        subscription_id: i64,
    ) -> Self {
        Self {
            db,
            id: next_record_id(),
            user_id: user_id.into(),
            subscription_id,
            kind: EntitlementKind::Subscription,
            paper_id: None,
            created_date: fixed_now() - Duration::days(1),
            validity: fixed_now() + Duration::days(30),
            active: true,
        }
    }

    pub fn kind(mut self, kind: EntitlementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn paper_id(mut self, paper_id: impl Into<String>) -> Self {
        self.paper_id = Some(paper_id.into());
        self
    }

    /// Sets the validity window.
    pub fn window(mut self, created_date: DateTime<Utc>, validity: DateTime<Utc>) -> Self {
        self.created_date = created_date;
        self.validity = validity;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builds and inserts the entitlement.
    ///
    /// # Returns
    /// - `Ok(entity::entitlement::Model)` - Created entitlement
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::entitlement::Model, DbErr> {
        entity::entitlement::ActiveModel {
            id: ActiveValue::Set(self.id),
            user_id: ActiveValue::Set(self.user_id),
            subscription_id: ActiveValue::Set(self.subscription_id),
            kind: ActiveValue::Set(self.kind),
            paper_id: ActiveValue::Set(self.paper_id),
            created_date: ActiveValue::Set(millis(self.created_date)),
            validity: ActiveValue::Set(millis(self.validity)),
            active: ActiveValue::Set(self.active),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a live SUBSCRIPTION grant with default values.
pub async fn create_entitlement(
    db: &DatabaseConnection,
    user_id: impl Into<String>,
    subscription_id: i64,
) -> Result<entity::entitlement::Model, DbErr> {
    EntitlementFactory::new(db, user_id, subscription_id)
        .build()
        .await
}
