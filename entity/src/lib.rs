//! SeaORM entity models for the subscription and entitlement store.

pub mod prelude;

pub mod entitlement;
pub mod paper_attempt;
pub mod purchase;
pub mod sea_orm_active_enums;
pub mod sellable_paper;
pub mod sequence_counter;
pub mod subscription;
pub mod subscription_paper;
pub mod subscription_price;
pub mod test_series_paper;
