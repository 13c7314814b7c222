use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::EntitlementKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entitlement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub paper_id: Option<String>,
    pub created_date: i64,
    pub validity: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
