pub use super::entitlement::Entity as Entitlement;
pub use super::paper_attempt::Entity as PaperAttempt;
pub use super::purchase::Entity as Purchase;
pub use super::sellable_paper::Entity as SellablePaper;
pub use super::sequence_counter::Entity as SequenceCounter;
pub use super::subscription::Entity as Subscription;
pub use super::subscription_paper::Entity as SubscriptionPaper;
pub use super::subscription_price::Entity as SubscriptionPrice;
pub use super::test_series_paper::Entity as TestSeriesPaper;
