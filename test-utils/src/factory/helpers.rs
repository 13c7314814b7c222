//! Shared helper utilities for factory methods.
//!
//! Provides ID generation, the fixed clock used by factory defaults and
//! convenience methods for creating entities with their dependencies.

use chrono::{DateTime, TimeZone, Utc};
use entity::sea_orm_active_enums::{SubscriptionState, TestType};
use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Offset for factory-assigned record IDs so they never collide with IDs issued
/// by the engine's sequence counters during the same test.
const FACTORY_ID_OFFSET: i64 = 1_000_000;

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Gets the next record ID for a factory-created row.
pub fn next_record_id() -> i64 {
    FACTORY_ID_OFFSET + next_id() as i64
}

/// The instant factory defaults are built around: 2026-10-18 12:00:00 UTC.
///
/// Whole seconds, so values survive the millisecond storage round trip unchanged.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Converts a timestamp to stored epoch milliseconds.
pub fn millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Creates an ACTIVE subscription together with the papers it holds.
///
/// Creates `paper_count` approved papers of `test_type`, then an ACTIVE
/// subscription bundling them in creation order, with every paper claimed by it.
///
/// # Arguments
/// - `db` - Database connection
/// - `test_type` - Catalog for the papers and the subscription
/// - `paper_count` - Number of papers to bundle
///
/// # Returns
/// - `Ok((subscription, papers))` - Created subscription and papers
/// - `Err(DbErr)` - Database error during creation
pub async fn create_active_subscription(
    db: &DatabaseConnection,
    test_type: TestType,
    paper_count: usize,
) -> Result<
    (
        entity::subscription::Model,
        Vec<entity::sellable_paper::Model>,
    ),
    DbErr,
> {
    let paper_ids: Vec<String> = (0..paper_count)
        .map(|_| format!("paper-{}", next_id()))
        .collect();

    let subscription = crate::factory::subscription::SubscriptionFactory::new(db, test_type)
        .state(SubscriptionState::Active)
        .papers(paper_ids.iter().cloned())
        .build()
        .await?;

    let mut papers = Vec::with_capacity(paper_count);
    for paper_id in paper_ids {
        papers.push(
            crate::factory::sellable_paper::SellablePaperFactory::new(db, test_type)
                .id(paper_id)
                .claimed_by(subscription.id)
                .build()
                .await?,
        );
    }

    Ok((subscription, papers))
}
