use crate::{
    data::subscription::SubscriptionRepository,
    model::subscription::{Classification, ClassificationFilter, NewSubscription, PriceTier},
};
use chrono::Duration;
use entity::{
    prelude::*,
    sea_orm_active_enums::{CommerceType, EntitlementKind, SubscriptionState, TestType},
};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{
    builder::TestBuilder,
    factory::{
        self,
        helpers::fixed_now,
        subscription::SubscriptionFactory,
    },
};

mod record_sale;

fn new_subscription(id: i64, paper_ids: &[&str]) -> NewSubscription {
    NewSubscription {
        id,
        name: "Banking Mock Pack".to_string(),
        description: Some("Ten full-length PO mocks".to_string()),
        classification: Classification {
            test_type: TestType::Paid,
            category: "BANKING".to_string(),
            sub_category: "PO".to_string(),
            commerce_type: CommerceType::Paid,
        },
        paper_ids: paper_ids.iter().map(|p| p.to_string()).collect(),
        validity: fixed_now() + Duration::days(30),
        pricing: vec![
            PriceTier {
                kind: EntitlementKind::Subscription,
                amount_minor: 49_900,
                duration_days: 30,
            },
            PriceTier {
                kind: EntitlementKind::Day,
                amount_minor: 4_900,
                duration_days: 1,
            },
        ],
        state: SubscriptionState::Draft,
        active_at: None,
        created_at: fixed_now(),
    }
}
