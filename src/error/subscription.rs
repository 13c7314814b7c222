use thiserror::Error;

use crate::model::subscription::PaperConflict;

/// Lifecycle conflicts raised by subscription operations.
#[derive(Error, Debug, PartialEq)]
pub enum SubscriptionError {
    #[error("Subscription {0} is already active")]
    AlreadyActive(i64),

    #[error("Subscription {0} is already in draft")]
    AlreadyDraft(i64),

    /// One or more papers are claimed by other subscriptions.
    ///
    /// Every conflicting paper is listed so the caller can resolve all of them
    /// before retrying.
    #[error("Papers already claimed by other subscriptions: {}", format_conflicts(.conflicts))]
    PapersClaimed { conflicts: Vec<PaperConflict> },

    /// Deactivation would silently revoke access from live subscribers.
    #[error("Subscription {subscription_id} has {subscriber_count} subscribers; force is required")]
    ActiveSubscribers {
        subscription_id: i64,
        subscriber_count: i32,
    },

    #[error("Subscription {0} must be deactivated before deletion")]
    DeleteWhileActive(i64),
}

fn format_conflicts(conflicts: &[PaperConflict]) -> String {
    conflicts
        .iter()
        .map(|c| match (c.subscription_id, &c.subscription_name) {
            (Some(id), Some(name)) => format!("{} (held by {} '{}')", c.paper_id, id, name),
            (Some(id), None) => format!("{} (held by {})", c.paper_id, id),
            _ => c.paper_id.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
