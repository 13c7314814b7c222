use entity::sea_orm_active_enums::TestType;
use thiserror::Error;

/// Stored state that violates a claim invariant.
///
/// These are surfaced to the caller and never corrected automatically, since fixing
/// them could revoke a paying user's access.
#[derive(Error, Debug, PartialEq)]
pub enum IntegrityError {
    #[error("Paper {paper_id} ({test_type:?}) is claimed by multiple active subscriptions: {subscription_ids:?}")]
    MultipleClaimants {
        test_type: TestType,
        paper_id: String,
        subscription_ids: Vec<i64>,
    },
}
