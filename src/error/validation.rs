use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{AttemptStatus, EntitlementKind, PaperState};
use thiserror::Error;

/// Request rejected before anything is persisted.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// A required text field was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A subscription must bundle at least one paper.
    #[error("A subscription must bundle at least one paper")]
    EmptyBundle,

    /// Validity deadline is not strictly after the current time.
    #[error("Validity {validity} is not in the future")]
    ValidityNotInFuture { validity: DateTime<Utc> },

    /// Paid subscriptions need at least one pricing tier.
    #[error("Paid subscriptions require pricing")]
    MissingPricing,

    /// A pricing tier has a negative amount, a non-positive duration or a kind
    /// already priced by another tier.
    #[error("Invalid pricing tier for {kind:?}")]
    InvalidPricing { kind: EntitlementKind },

    /// Entitlement window ends before or when it starts.
    #[error("Validity window must end after it starts")]
    InvalidWindow,

    /// DAY grants must name exactly one paper.
    #[error("DAY grants require a paper id")]
    DayGrantRequiresPaper,

    /// Only DAY grants carry a paper id.
    #[error("{kind:?} grants cannot be scoped to a single paper")]
    PaperIdNotAllowed { kind: EntitlementKind },

    /// Paper requested for a DAY grant is not part of the subscription's bundle.
    #[error("Paper {paper_id} is not bundled by subscription {subscription_id}")]
    PaperNotInBundle {
        subscription_id: i64,
        paper_id: String,
    },

    /// Subscription has no price for the requested entitlement kind.
    #[error("Subscription {subscription_id} does not sell {kind:?} access")]
    KindNotSold {
        subscription_id: i64,
        kind: EntitlementKind,
    },

    /// START is the virtual placeholder status and is never written.
    #[error("START attempts are not persisted")]
    StartNotWritable,

    /// Attempt status move outside the attempt state machine.
    #[error("Cannot move attempt from {from:?} to {to:?}")]
    IllegalAttemptTransition {
        from: AttemptStatus,
        to: AttemptStatus,
    },

    /// Paper lifecycle status may only move forward.
    #[error("Paper {paper_id} cannot move from {from:?} to {to:?}")]
    PaperStateRegression {
        paper_id: String,
        from: PaperState,
        to: PaperState,
    },
}
