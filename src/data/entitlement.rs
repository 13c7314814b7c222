use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::entitlement::{Entitlement, NewEntitlement},
    util::time::to_millis,
};

/// Repository for user entitlements.
pub struct EntitlementRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EntitlementRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new active entitlement.
    pub async fn create(&self, params: NewEntitlement) -> Result<Entitlement, DbErr> {
        let entitlement = entity::entitlement::ActiveModel {
            id: ActiveValue::Set(params.id),
            user_id: ActiveValue::Set(params.user_id),
            subscription_id: ActiveValue::Set(params.subscription_id),
            kind: ActiveValue::Set(params.kind),
            paper_id: ActiveValue::Set(params.paper_id),
            created_date: ActiveValue::Set(to_millis(params.window.valid_from)),
            validity: ActiveValue::Set(to_millis(params.window.valid_until)),
            active: ActiveValue::Set(true),
        }
        .insert(self.db)
        .await?;

        Entitlement::from_entity(entitlement)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Entitlement>, DbErr> {
        entity::prelude::Entitlement::find_by_id(id)
            .one(self.db)
            .await?
            .map(Entitlement::from_entity)
            .transpose()
    }

    /// Gets every live entitlement of a user.
    ///
    /// Live means active with `created_date <= now <= validity`. Ordered oldest
    /// first by creation time, ties broken by ID.
    pub async fn find_live(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entitlement>, DbErr> {
        let now = to_millis(now);

        entity::prelude::Entitlement::find()
            .filter(entity::entitlement::Column::UserId.eq(user_id))
            .filter(entity::entitlement::Column::Active.eq(true))
            .filter(entity::entitlement::Column::CreatedDate.lte(now))
            .filter(entity::entitlement::Column::Validity.gte(now))
            .order_by_asc(entity::entitlement::Column::CreatedDate)
            .order_by_asc(entity::entitlement::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Entitlement::from_entity)
            .collect()
    }

    /// Gets the live entitlements of a user for one subscription, oldest first.
    pub async fn find_live_for_subscription(
        &self,
        user_id: &str,
        subscription_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entitlement>, DbErr> {
        let now = to_millis(now);

        entity::prelude::Entitlement::find()
            .filter(entity::entitlement::Column::UserId.eq(user_id))
            .filter(entity::entitlement::Column::SubscriptionId.eq(subscription_id))
            .filter(entity::entitlement::Column::Active.eq(true))
            .filter(entity::entitlement::Column::CreatedDate.lte(now))
            .filter(entity::entitlement::Column::Validity.gte(now))
            .order_by_asc(entity::entitlement::Column::CreatedDate)
            .order_by_asc(entity::entitlement::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Entitlement::from_entity)
            .collect()
    }

    /// Gets active entitlements of a user created at or before `now`, newest first.
    ///
    /// Expired grants are included so callers can show recently lapsed access.
    /// `limit` caps the number of rows read; `None` reads them all.
    pub async fn find_recent(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: Option<u64>,
    ) -> Result<Vec<Entitlement>, DbErr> {
        entity::prelude::Entitlement::find()
            .filter(entity::entitlement::Column::UserId.eq(user_id))
            .filter(entity::entitlement::Column::Active.eq(true))
            .filter(entity::entitlement::Column::CreatedDate.lte(to_millis(now)))
            .order_by_desc(entity::entitlement::Column::CreatedDate)
            .order_by_desc(entity::entitlement::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(Entitlement::from_entity)
            .collect()
    }

    /// Clears the active flag of an entitlement.
    ///
    /// # Returns
    /// - `Ok(true)` - The entitlement existed and was deactivated
    /// - `Ok(false)` - No entitlement with that ID
    pub async fn deactivate(&self, id: i64) -> Result<bool, DbErr> {
        let result = entity::prelude::Entitlement::update_many()
            .col_expr(entity::entitlement::Column::Active, Expr::value(false))
            .filter(entity::entitlement::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
