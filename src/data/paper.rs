use entity::sea_orm_active_enums::{PaperState, TestType};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::paper::SellablePaper;

/// Repository for the sellable paper catalog and its claim flags.
pub struct SellablePaperRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SellablePaperRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a single paper by its catalog key.
    pub async fn get_by_id(
        &self,
        test_type: TestType,
        paper_id: &str,
    ) -> Result<Option<SellablePaper>, DbErr> {
        entity::prelude::SellablePaper::find_by_id((test_type, paper_id.to_string()))
            .one(self.db)
            .await?
            .map(SellablePaper::from_entity)
            .transpose()
    }

    /// Gets the papers with the given IDs from one catalog.
    ///
    /// IDs without a catalog row are silently absent from the result. Order follows
    /// the catalog, not the input.
    pub async fn find_many(
        &self,
        test_type: TestType,
        paper_ids: &[String],
    ) -> Result<Vec<SellablePaper>, DbErr> {
        if paper_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::SellablePaper::find()
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Id.is_in(paper_ids.iter().cloned()))
            .all(self.db)
            .await?
            .into_iter()
            .map(SellablePaper::from_entity)
            .collect()
    }

    /// Claims a paper for a subscription if nobody holds it.
    ///
    /// A single conditional update: the row only changes while `claimed` is false,
    /// so two subscriptions racing for the same paper cannot both succeed.
    ///
    /// # Returns
    /// - `Ok(true)` - The claim was taken by `subscription_id`
    /// - `Ok(false)` - The paper is missing or already claimed
    pub async fn try_claim(
        &self,
        test_type: TestType,
        paper_id: &str,
        subscription_id: i64,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::SellablePaper::update_many()
            .col_expr(entity::sellable_paper::Column::Claimed, Expr::value(true))
            .col_expr(
                entity::sellable_paper::Column::ClaimedBy,
                Expr::value(subscription_id),
            )
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Id.eq(paper_id))
            .filter(entity::sellable_paper::Column::Claimed.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Clears the claim on papers held by `subscription_id`.
    ///
    /// Papers claimed by another subscription are left untouched, which makes the
    /// call safe to repeat.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of claims cleared
    pub async fn release(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        subscription_id: i64,
    ) -> Result<u64, DbErr> {
        if paper_ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::SellablePaper::update_many()
            .col_expr(entity::sellable_paper::Column::Claimed, Expr::value(false))
            .col_expr(
                entity::sellable_paper::Column::ClaimedBy,
                Expr::value(Option::<i64>::None),
            )
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Id.is_in(paper_ids.iter().cloned()))
            .filter(entity::sellable_paper::Column::ClaimedBy.eq(subscription_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Lists unclaimed, approved papers an author can add to a new bundle.
    ///
    /// # Arguments
    /// - `test_type` - Catalog to search
    /// - `category` - Optional category constraint
    /// - `sub_category` - Optional sub-category constraint
    pub async fn list_claimable(
        &self,
        test_type: TestType,
        category: Option<&str>,
        sub_category: Option<&str>,
    ) -> Result<Vec<SellablePaper>, DbErr> {
        let mut query = entity::prelude::SellablePaper::find()
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Claimed.eq(false))
            .filter(entity::sellable_paper::Column::Status.eq(PaperState::Approved));

        if let Some(category) = category {
            query = query.filter(entity::sellable_paper::Column::Category.eq(category));
        }
        if let Some(sub_category) = sub_category {
            query = query.filter(entity::sellable_paper::Column::SubCategory.eq(sub_category));
        }

        query
            .order_by_asc(entity::sellable_paper::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(SellablePaper::from_entity)
            .collect()
    }

    /// Lists every claimed paper in a catalog.
    pub async fn list_claimed(&self, test_type: TestType) -> Result<Vec<SellablePaper>, DbErr> {
        entity::prelude::SellablePaper::find()
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Claimed.eq(true))
            .order_by_asc(entity::sellable_paper::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(SellablePaper::from_entity)
            .collect()
    }

    /// Sets the lifecycle status of a paper.
    ///
    /// # Returns
    /// - `Ok(true)` - The paper exists and was updated
    /// - `Ok(false)` - No paper with that key
    pub async fn set_status(
        &self,
        test_type: TestType,
        paper_id: &str,
        status: PaperState,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::SellablePaper::update_many()
            .col_expr(entity::sellable_paper::Column::Status, Expr::value(status))
            .filter(entity::sellable_paper::Column::TestType.eq(test_type))
            .filter(entity::sellable_paper::Column::Id.eq(paper_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
