use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{EntitlementKind, PurchaseStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub paper_id: Option<String>,
    pub amount_minor: i64,
    pub status: PurchaseStatus,
    pub entitlement_id: Option<i64>,
    pub created_date: i64,
    pub updated_date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
