use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::PurchaseStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter,
};

use crate::{
    model::purchase::{NewPurchase, Purchase},
    util::time::to_millis,
};

pub struct PurchaseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PurchaseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a purchase in PENDING state.
    pub async fn create(&self, params: NewPurchase) -> Result<Purchase, DbErr> {
        let now = to_millis(params.now);

        let purchase = entity::purchase::ActiveModel {
            id: ActiveValue::Set(params.id),
            user_id: ActiveValue::Set(params.user_id),
            subscription_id: ActiveValue::Set(params.subscription_id),
            kind: ActiveValue::Set(params.kind),
            paper_id: ActiveValue::Set(params.paper_id),
            amount_minor: ActiveValue::Set(params.amount_minor),
            status: ActiveValue::Set(PurchaseStatus::Pending),
            entitlement_id: ActiveValue::Set(None),
            created_date: ActiveValue::Set(now),
            updated_date: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await?;

        Purchase::from_entity(purchase)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Purchase>, DbErr> {
        entity::prelude::Purchase::find_by_id(id)
            .one(self.db)
            .await?
            .map(Purchase::from_entity)
            .transpose()
    }

    /// Settles a pending purchase as COMPLETED or FAILED.
    ///
    /// Only PENDING purchases change; a settled purchase keeps its outcome.
    ///
    /// # Returns
    /// - `Ok(true)` - The purchase was pending and is now settled
    /// - `Ok(false)` - No pending purchase with that ID
    pub async fn set_outcome(
        &self,
        id: i64,
        status: PurchaseStatus,
        entitlement_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Purchase::update_many()
            .col_expr(entity::purchase::Column::Status, Expr::value(status))
            .col_expr(
                entity::purchase::Column::EntitlementId,
                Expr::value(entitlement_id),
            )
            .col_expr(
                entity::purchase::Column::UpdatedDate,
                Expr::value(to_millis(now)),
            )
            .filter(entity::purchase::Column::Id.eq(id))
            .filter(entity::purchase::Column::Status.eq(PurchaseStatus::Pending))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
