//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating engine entities with sensible
//! defaults, reducing boilerplate in tests. Timestamps default to windows around
//! [`helpers::fixed_now`] so tests can pass that instant to services and get
//! deterministic liveness.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let paper = factory::create_paper(&db, TestType::Paid).await?;
//!
//!     // Create an active subscription holding its papers
//!     let (subscription, papers) =
//!         factory::helpers::create_active_subscription(&db, TestType::Paid, 2).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let subscription = factory::subscription::SubscriptionFactory::new(&db, TestType::Paid)
//!     .name("Banking Mock Pack")
//!     .papers(["P1", "P2"])
//!     .price(EntitlementKind::Subscription, 49_900, 30)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `sellable_paper` - Create catalog papers
//! - `subscription` - Create subscriptions with bundle and pricing rows
//! - `entitlement` - Create user grants
//! - `paper_attempt` - Create materialized attempts
//! - `test_series` - Create test series listings
//! - `helpers` - ID generation, the fixed test clock and multi-entity helpers

pub mod entitlement;
pub mod helpers;
pub mod paper_attempt;
pub mod sellable_paper;
pub mod subscription;
pub mod test_series;

pub use entitlement::create_entitlement;
pub use paper_attempt::create_attempt;
pub use sellable_paper::create_paper;
pub use subscription::create_subscription;
pub use test_series::create_test_series_listing;
