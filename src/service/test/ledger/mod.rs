use crate::{
    error::{
        integrity::IntegrityError, subscription::SubscriptionError, validation::ValidationError,
        AppError,
    },
    model::{paper::ClaimAnomaly, subscription::PaperConflict},
    service::ledger::LedgerService,
};
use entity::sea_orm_active_enums::{PaperState, SubscriptionState, TestType};
use test_utils::{
    builder::TestBuilder,
    factory::{
        helpers::create_active_subscription, sellable_paper::SellablePaperFactory,
        subscription::SubscriptionFactory,
    },
};

mod claim_all;

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
