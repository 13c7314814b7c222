use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EntitlementError {
    /// Referenced subscription is missing, in draft, expired or has an empty bundle.
    #[error("Subscription {subscription_id} is unavailable")]
    SubscriptionUnavailable { subscription_id: i64 },

    /// User already holds a live DAY grant for this paper.
    #[error("User {user_id} already holds live DAY grant {entitlement_id} for paper {paper_id}")]
    DuplicateDayGrant {
        user_id: String,
        paper_id: String,
        entitlement_id: i64,
    },

    /// A live broader grant already covers the requested access.
    #[error("Access is already covered by entitlement {entitlement_id}")]
    AlreadyCovered { entitlement_id: i64 },

    /// User has no live entitlement covering the paper.
    #[error("User {user_id} is not entitled to paper {paper_id}")]
    NotEntitled { user_id: String, paper_id: String },
}
