use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Paper catalog a paper, subscription or attempt belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    #[sea_orm(string_value = "FREE")]
    Free,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "PAST")]
    Past,
    #[sea_orm(string_value = "QUIZ")]
    Quiz,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommerceType {
    #[sea_orm(string_value = "FREE")]
    Free,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

/// Catalog lifecycle of a sellable paper. Moves forward only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaperState {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
}

impl PaperState {
    /// Position in the DRAFT -> ACTIVE -> APPROVED ordering.
    pub fn rank(self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Active => 1,
            Self::Approved => 2,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionState {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitlementKind {
    #[sea_orm(string_value = "SUBSCRIPTION")]
    Subscription,
    #[sea_orm(string_value = "FREE_SUBSCRIPTION")]
    FreeSubscription,
    #[sea_orm(string_value = "TEST_SERIES")]
    TestSeries,
    #[sea_orm(string_value = "DAY")]
    Day,
}

impl EntitlementKind {
    /// Whether a grant of this kind covers a subscription's whole bundle or series.
    pub fn is_broad(self) -> bool {
        !matches!(self, Self::Day)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    #[sea_orm(string_value = "START")]
    Start,
    #[sea_orm(string_value = "INPROGRESS")]
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[sea_orm(string_value = "RESUME")]
    Resume,
    #[sea_orm(string_value = "DONE")]
    Done,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}
