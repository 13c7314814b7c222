use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Repository for test series paper listings.
///
/// A test series grant covers the papers listed here for its subscription rather
/// than the subscription's bundle.
pub struct TestSeriesRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TestSeriesRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the paper IDs listed for a series in listing order.
    pub async fn paper_ids(&self, subscription_id: i64) -> Result<Vec<String>, DbErr> {
        Ok(entity::prelude::TestSeriesPaper::find()
            .filter(entity::test_series_paper::Column::SubscriptionId.eq(subscription_id))
            .order_by_asc(entity::test_series_paper::Column::Position)
            .all(self.db)
            .await?
            .into_iter()
            .map(|p| p.paper_id)
            .collect())
    }

    /// Replaces the listing of a series.
    pub async fn replace(&self, subscription_id: i64, paper_ids: &[String]) -> Result<(), DbErr> {
        entity::prelude::TestSeriesPaper::delete_many()
            .filter(entity::test_series_paper::Column::SubscriptionId.eq(subscription_id))
            .exec(self.db)
            .await?;

        for (position, paper_id) in paper_ids.iter().enumerate() {
            entity::test_series_paper::ActiveModel {
                subscription_id: ActiveValue::Set(subscription_id),
                paper_id: ActiveValue::Set(paper_id.clone()),
                position: ActiveValue::Set(position as i32),
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }
}
