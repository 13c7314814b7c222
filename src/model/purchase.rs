//! Purchase domain models.
//!
//! A purchase records the commerce side of a grant: what was bought, for how much,
//! and whether the resulting entitlement was created. No payment gateway is
//! involved; the status reflects the grant outcome.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntitlementKind, PurchaseStatus};
use sea_orm::DbErr;
use serde::Serialize;

use crate::util::time::from_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub paper_id: Option<String>,
    pub amount_minor: i64,
    pub status: PurchaseStatus,
    pub entitlement_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::purchase::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            subscription_id: entity.subscription_id,
            kind: entity.kind,
            paper_id: entity.paper_id,
            amount_minor: entity.amount_minor,
            status: entity.status,
            entitlement_id: entity.entitlement_id,
            created_at: from_millis(entity.created_date)?,
            updated_at: from_millis(entity.updated_date)?,
        })
    }
}

/// Parameters for buying access to a subscription.
#[derive(Debug, Clone)]
pub struct PurchaseParams {
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    /// Paper for DAY purchases.
    pub paper_id: Option<String>,
}

/// Row data handed to the repository when recording a purchase.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub paper_id: Option<String>,
    pub amount_minor: i64,
    pub now: DateTime<Utc>,
}
