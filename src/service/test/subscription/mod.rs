use crate::{
    data::paper::SellablePaperRepository,
    error::{subscription::SubscriptionError, validation::ValidationError, AppError},
    model::subscription::{
        Classification, ClassificationFilter, CreateSubscriptionParams, PriceTier,
        ValidityExtension,
    },
    service::subscription::SubscriptionService,
};
use chrono::Duration;
use entity::sea_orm_active_enums::{CommerceType, EntitlementKind, SubscriptionState, TestType};
use sea_orm::{DatabaseConnection, DbErr};
use tokio::task::JoinSet;
use test_utils::{
    builder::TestBuilder,
    factory::{
        helpers::{create_active_subscription, fixed_now},
        sellable_paper::SellablePaperFactory,
        subscription::SubscriptionFactory,
    },
};

mod create;
mod get_paginated;

/// Parameters for a PAID subscription over PAID papers.
fn params(name: &str, paper_ids: &[&str]) -> CreateSubscriptionParams {
    CreateSubscriptionParams {
        name: name.to_string(),
        description: None,
        classification: Classification {
            test_type: TestType::Paid,
            category: "BANKING".to_string(),
            sub_category: "PO".to_string(),
            commerce_type: CommerceType::Paid,
        },
        paper_ids: paper_ids.iter().map(|id| id.to_string()).collect(),
        validity: fixed_now() + Duration::days(30),
        pricing: vec![PriceTier {
            kind: EntitlementKind::Subscription,
            amount_minor: 49_900,
            duration_days: 30,
        }],
        activate_immediately: false,
    }
}

async fn create_papers(db: &DatabaseConnection, paper_ids: &[&str]) -> Result<(), DbErr> {
    for paper_id in paper_ids {
        SellablePaperFactory::new(db, TestType::Paid)
            .id(*paper_id)
            .build()
            .await?;
    }

    Ok(())
}

/// Gets the holder of a PAID paper's claim, `None` when unclaimed.
async fn holder_of(db: &DatabaseConnection, paper_id: &str) -> Result<Option<i64>, DbErr> {
    Ok(SellablePaperRepository::new(db)
        .get_by_id(TestType::Paid, paper_id)
        .await?
        .filter(|p| p.claimed)
        .and_then(|p| p.claimed_by))
}
