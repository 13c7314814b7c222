use crate::{
    error::{entitlement::EntitlementError, validation::ValidationError, AppError},
    model::{purchase::PurchaseParams, subscription::ClassificationFilter},
    service::{
        entitlement::EntitlementService, purchase::PurchaseService,
        subscription::SubscriptionService,
    },
};
use chrono::Duration;
use entity::sea_orm_active_enums::{
    CommerceType, EntitlementKind, PurchaseStatus, SubscriptionState, TestType,
};
use test_utils::{
    builder::TestBuilder,
    factory::{helpers::fixed_now, subscription::SubscriptionFactory},
};


fn params(subscription_id: i64, kind: EntitlementKind, paper_id: Option<&str>) -> PurchaseParams {
    PurchaseParams {
        user_id: "user-1".to_string(),
        subscription_id,
        kind,
        paper_id: paper_id.map(str::to_string),
    }
}
