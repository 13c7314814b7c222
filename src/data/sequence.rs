use migration::OnConflict;
use sea_orm::{
    sea_query::Expr, ActiveValue, DatabaseConnection, DbErr, EntityTrait, ExprTrait,
};

/// Repository for per-category ID counters.
pub struct SequenceRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SequenceRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Increments the counter for a category and returns the new value.
    ///
    /// Runs as one upsert statement: the first use of a category inserts the counter
    /// at 1, every later use increments it in place and returns the incremented row.
    /// Concurrent callers are serialized by the store, so no two callers observe the
    /// same value.
    ///
    /// # Arguments
    /// - `category` - Counter key
    ///
    /// # Returns
    /// - `Ok(i64)` - Newly issued value
    /// - `Err(DbErr)` - Database error during the upsert
    pub async fn next(&self, category: &str) -> Result<i64, DbErr> {
        let counter = entity::prelude::SequenceCounter::insert(
            entity::sequence_counter::ActiveModel {
                category: ActiveValue::Set(category.to_string()),
                value: ActiveValue::Set(1),
            },
        )
        .on_conflict(
            OnConflict::column(entity::sequence_counter::Column::Category)
                .value(
                    entity::sequence_counter::Column::Value,
                    Expr::col(entity::sequence_counter::Column::Value).add(1),
                )
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(counter.value)
    }
}
