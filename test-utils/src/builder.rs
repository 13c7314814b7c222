use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Add entity tables, then call `build()` to create the configured context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{SellablePaper, SequenceCounter};
///
/// let test = TestBuilder::new()
///     .with_table(SequenceCounter)
///     .with_table(SellablePaper)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables with foreign keys must be added after the tables they
    /// reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the tables needed for subscription lifecycle operations.
    ///
    /// Adds, in dependency order:
    /// - SequenceCounter
    /// - SellablePaper
    /// - Subscription
    /// - SubscriptionPaper
    /// - SubscriptionPrice
    pub fn with_subscription_tables(self) -> Self {
        self.with_table(SequenceCounter)
            .with_table(SellablePaper)
            .with_table(Subscription)
            .with_table(SubscriptionPaper)
            .with_table(SubscriptionPrice)
    }

    /// Adds every engine table.
    ///
    /// Equivalent to `with_subscription_tables()` followed by the entitlement,
    /// attempt, purchase and test series tables. Use this for service tests that
    /// span grants and attempts.
    pub fn with_engine_tables(self) -> Self {
        self.with_subscription_tables()
            .with_table(Entitlement)
            .with_table(PaperAttempt)
            .with_table(Purchase)
            .with_table(TestSeriesPaper)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized context with database and tables ready
    /// - `Err(TestError::Database)` - Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
