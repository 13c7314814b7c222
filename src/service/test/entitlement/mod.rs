use crate::{
    error::{entitlement::EntitlementError, validation::ValidationError, AppError},
    model::{
        entitlement::{GrantOutcome, GrantParams, ValidityWindow},
        subscription::ClassificationFilter,
    },
    service::entitlement::EntitlementService,
};
use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{EntitlementKind, SubscriptionState, TestType};
use sea_orm::{DatabaseConnection, DbErr};
use test_utils::{
    builder::TestBuilder,
    factory::{
        self, entitlement::EntitlementFactory, helpers::fixed_now,
        sellable_paper::SellablePaperFactory, subscription::SubscriptionFactory,
    },
};

mod grant;
mod resolve_accessible_papers;

/// Creates an ACTIVE subscription holding the given papers.
async fn active_bundle(
    db: &DatabaseConnection,
    test_type: TestType,
    paper_ids: &[&str],
) -> Result<entity::subscription::Model, DbErr> {
    let subscription = SubscriptionFactory::new(db, test_type)
        .state(SubscriptionState::Active)
        .papers(paper_ids.iter().copied())
        .build()
        .await?;

    for paper_id in paper_ids {
        SellablePaperFactory::new(db, test_type)
            .id(*paper_id)
            .claimed_by(subscription.id)
            .build()
            .await?;
    }

    Ok(subscription)
}

/// Grant request for user-1 valid from `from` for `days` days.
fn request(
    subscription_id: i64,
    kind: EntitlementKind,
    paper_id: Option<&str>,
    from: DateTime<Utc>,
    days: i64,
) -> GrantParams {
    GrantParams {
        user_id: "user-1".to_string(),
        subscription_id,
        kind,
        window: ValidityWindow {
            valid_from: from,
            valid_until: from + Duration::days(days),
        },
        paper_id: paper_id.map(str::to_string),
    }
}
