use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{PaperState, TestType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sellable_paper")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub test_type: TestType,
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub category: String,
    pub sub_category: String,
    pub status: PaperState,
    pub claimed: bool,
    pub claimed_by: Option<i64>,
    pub start_date: i64,
    pub end_date: i64,
    pub question_count: i32,
    #[sea_orm(column_type = "Double")]
    pub marks_per_question: f64,
    #[sea_orm(column_type = "Double")]
    pub negative_marks: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
