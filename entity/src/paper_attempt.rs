use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{AttemptStatus, TestType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "paper_attempt")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub test_type: TestType,
    #[sea_orm(primary_key, auto_increment = false)]
    pub paper_id: String,
    pub status: AttemptStatus,
    pub entitlement_id: i64,
    pub question_count: i32,
    #[sea_orm(column_type = "Double")]
    pub marks_per_question: f64,
    #[sea_orm(column_type = "Double")]
    pub negative_marks: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    pub valid_from: i64,
    pub valid_until: i64,
    pub started_date: i64,
    pub updated_date: i64,
    pub completed_date: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
