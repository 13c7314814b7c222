pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_sequence_counter_table;
mod m20261018_000002_create_sellable_paper_table;
mod m20261018_000003_create_subscription_table;
mod m20261018_000004_create_subscription_paper_table;
mod m20261018_000005_create_subscription_price_table;
mod m20261018_000006_create_entitlement_table;
mod m20261018_000007_create_paper_attempt_table;
mod m20261018_000008_create_purchase_table;
mod m20261018_000009_create_test_series_paper_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_sequence_counter_table::Migration),
            Box::new(m20261018_000002_create_sellable_paper_table::Migration),
            Box::new(m20261018_000003_create_subscription_table::Migration),
            Box::new(m20261018_000004_create_subscription_paper_table::Migration),
            Box::new(m20261018_000005_create_subscription_price_table::Migration),
            Box::new(m20261018_000006_create_entitlement_table::Migration),
            Box::new(m20261018_000007_create_paper_attempt_table::Migration),
            Box::new(m20261018_000008_create_purchase_table::Migration),
            Box::new(m20261018_000009_create_test_series_paper_table::Migration),
        ]
    }
}
