use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{CommerceType, SubscriptionState, TestType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub test_type: TestType,
    pub category: String,
    pub sub_category: String,
    pub commerce_type: CommerceType,
    pub state: SubscriptionState,
    pub validity: i64,
    pub created_date: i64,
    pub active_date: Option<i64>,
    pub updated_date: i64,
    pub subscriber_count: i32,
    pub revenue_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subscription_paper::Entity")]
    SubscriptionPaper,
    #[sea_orm(has_many = "super::subscription_price::Entity")]
    SubscriptionPrice,
}

impl Related<super::subscription_paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriptionPaper.def()
    }
}

impl Related<super::subscription_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriptionPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
