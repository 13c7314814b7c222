use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{SubscriptionState, TestType};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionSession, TransactionTrait,
};
use std::collections::HashMap;

use crate::{
    model::subscription::{ClassificationFilter, NewSubscription, Subscription},
    util::time::to_millis,
};

/// Bundle slot of a paper inside an ACTIVE subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveHolder {
    pub paper_id: String,
    pub subscription_id: i64,
    pub subscription_name: String,
}

/// Repository for subscriptions with their bundle and pricing rows.
///
/// Works on a plain connection or inside a transaction opened by the caller.
pub struct SubscriptionRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubscriptionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a subscription with its bundle and pricing.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, DbErr> {
        let Some(subscription) = entity::prelude::Subscription::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.with_relations(vec![subscription]).await?.pop())
    }

    /// Gets several subscriptions keyed by ID. Unknown IDs are absent from the map.
    pub async fn get_many(&self, ids: &[i64]) -> Result<HashMap<i64, Subscription>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let subscriptions = entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(self
            .with_relations(subscriptions)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    /// Gets a page of subscriptions matching a classification filter and state.
    ///
    /// Ordered by ID. `page` is zero-based.
    ///
    /// # Returns
    /// - `Ok((subscriptions, total))` - Page contents and total number of matches
    pub async fn get_paginated(
        &self,
        filter: &ClassificationFilter,
        state: Option<SubscriptionState>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Subscription>, u64), DbErr> {
        let mut query = entity::prelude::Subscription::find();

        if let Some(test_type) = filter.test_type {
            query = query.filter(entity::subscription::Column::TestType.eq(test_type));
        }
        if let Some(category) = &filter.category {
            query = query.filter(entity::subscription::Column::Category.eq(category.as_str()));
        }
        if let Some(sub_category) = &filter.sub_category {
            query =
                query.filter(entity::subscription::Column::SubCategory.eq(sub_category.as_str()));
        }
        if let Some(commerce_type) = filter.commerce_type {
            query = query.filter(entity::subscription::Column::CommerceType.eq(commerce_type));
        }
        if let Some(state) = state {
            query = query.filter(entity::subscription::Column::State.eq(state));
        }

        let paginator = query
            .order_by_asc(entity::subscription::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let subscriptions = paginator.fetch_page(page).await?;

        Ok((self.with_relations(subscriptions).await?, total))
    }

    /// Lists every subscription of a test type in a given state, ordered by ID.
    pub async fn list_by_state(
        &self,
        test_type: TestType,
        state: SubscriptionState,
    ) -> Result<Vec<Subscription>, DbErr> {
        let subscriptions = entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::TestType.eq(test_type))
            .filter(entity::subscription::Column::State.eq(state))
            .order_by_asc(entity::subscription::Column::Id)
            .all(self.db)
            .await?;

        self.with_relations(subscriptions).await
    }

    /// Sets the lifecycle state.
    ///
    /// `active_at` is written only when given, so deactivation keeps the date of the
    /// last activation.
    pub async fn set_state(
        &self,
        id: i64,
        state: SubscriptionState,
        active_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let mut update = entity::prelude::Subscription::update_many()
            .col_expr(entity::subscription::Column::State, Expr::value(state))
            .col_expr(
                entity::subscription::Column::UpdatedDate,
                Expr::value(to_millis(now)),
            );

        if let Some(active_at) = active_at {
            update = update.col_expr(
                entity::subscription::Column::ActiveDate,
                Expr::value(to_millis(active_at)),
            );
        }

        update
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Replaces the validity deadline.
    pub async fn set_validity(
        &self,
        id: i64,
        validity: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::Subscription::update_many()
            .col_expr(
                entity::subscription::Column::Validity,
                Expr::value(to_millis(validity)),
            )
            .col_expr(
                entity::subscription::Column::UpdatedDate,
                Expr::value(to_millis(now)),
            )
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Adds one completed sale to the cached subscriber count and revenue.
    ///
    /// Both counters are incremented in place by the store.
    pub async fn record_sale(
        &self,
        id: i64,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::Subscription::update_many()
            .col_expr(
                entity::subscription::Column::SubscriberCount,
                Expr::col(entity::subscription::Column::SubscriberCount).add(1),
            )
            .col_expr(
                entity::subscription::Column::RevenueMinor,
                Expr::col(entity::subscription::Column::RevenueMinor).add(amount_minor),
            )
            .col_expr(
                entity::subscription::Column::UpdatedDate,
                Expr::value(to_millis(now)),
            )
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Finds ACTIVE subscriptions that bundle any of the given papers.
    ///
    /// # Arguments
    /// - `test_type` - Catalog of the papers
    /// - `paper_ids` - Papers to look up
    /// - `exclude` - Subscription to leave out, usually the caller's own
    ///
    /// # Returns
    /// - `Ok(Vec<ActiveHolder>)` - One entry per bundled paper, ordered by subscription
    ///   ID and then paper ID
    pub async fn find_active_holders(
        &self,
        test_type: TestType,
        paper_ids: &[String],
        exclude: Option<i64>,
    ) -> Result<Vec<ActiveHolder>, DbErr> {
        if paper_ids.is_empty() {
            return Ok(Vec::new());
        }

        let bundle_rows = entity::prelude::SubscriptionPaper::find()
            .filter(entity::subscription_paper::Column::TestType.eq(test_type))
            .filter(entity::subscription_paper::Column::PaperId.is_in(paper_ids.iter().cloned()))
            .all(self.db)
            .await?;

        let subscription_ids: Vec<i64> = bundle_rows
            .iter()
            .map(|r| r.subscription_id)
            .filter(|id| Some(*id) != exclude)
            .collect();

        if subscription_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names: HashMap<i64, String> = entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::Id.is_in(subscription_ids))
            .filter(entity::subscription::Column::State.eq(SubscriptionState::Active))
            .all(self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut holders: Vec<ActiveHolder> = bundle_rows
            .into_iter()
            .filter_map(|row| {
                names.get(&row.subscription_id).map(|name| ActiveHolder {
                    paper_id: row.paper_id,
                    subscription_id: row.subscription_id,
                    subscription_name: name.clone(),
                })
            })
            .collect();

        holders.sort_by(|a, b| {
            a.subscription_id
                .cmp(&b.subscription_id)
                .then_with(|| a.paper_id.cmp(&b.paper_id))
        });

        Ok(holders)
    }

    /// Gets subscription names keyed by ID.
    pub async fn get_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect())
    }

    async fn insert_papers(
        &self,
        id: i64,
        test_type: TestType,
        paper_ids: &[String],
    ) -> Result<(), DbErr> {
        for (position, paper_id) in paper_ids.iter().enumerate() {
            entity::subscription_paper::ActiveModel {
                subscription_id: ActiveValue::Set(id),
                paper_id: ActiveValue::Set(paper_id.clone()),
                test_type: ActiveValue::Set(test_type),
                position: ActiveValue::Set(position as i32),
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    async fn touch(&self, id: i64, now: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::Subscription::update_many()
            .col_expr(
                entity::subscription::Column::UpdatedDate,
                Expr::value(to_millis(now)),
            )
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Loads bundle and pricing rows for a set of subscriptions in two queries.
    async fn with_relations(
        &self,
        subscriptions: Vec<entity::subscription::Model>,
    ) -> Result<Vec<Subscription>, DbErr> {
        if subscriptions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = subscriptions.iter().map(|s| s.id).collect();

        let mut papers: HashMap<i64, Vec<entity::subscription_paper::Model>> = HashMap::new();
        for paper in entity::prelude::SubscriptionPaper::find()
            .filter(entity::subscription_paper::Column::SubscriptionId.is_in(ids.clone()))
            .all(self.db)
            .await?
        {
            papers.entry(paper.subscription_id).or_default().push(paper);
        }

        let mut prices: HashMap<i64, Vec<entity::subscription_price::Model>> = HashMap::new();
        for price in entity::prelude::SubscriptionPrice::find()
            .filter(entity::subscription_price::Column::SubscriptionId.is_in(ids))
            .all(self.db)
            .await?
        {
            prices.entry(price.subscription_id).or_default().push(price);
        }

        subscriptions
            .into_iter()
            .map(|s| {
                let bundle = papers.remove(&s.id).unwrap_or_default();
                let pricing = prices.remove(&s.id).unwrap_or_default();
                Subscription::from_entity(s, bundle, pricing)
            })
            .collect()
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> SubscriptionRepository<'a, C> {
    /// Persists a subscription with its bundle and pricing rows.
    ///
    /// All rows are written in one transaction, so a failed insert leaves nothing
    /// behind. Bundle positions follow the order of `params.paper_ids`.
    pub async fn create(&self, params: NewSubscription) -> Result<Subscription, DbErr> {
        let id = params.id;
        let txn = self.db.begin().await?;

        entity::subscription::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            test_type: ActiveValue::Set(params.classification.test_type),
            category: ActiveValue::Set(params.classification.category),
            sub_category: ActiveValue::Set(params.classification.sub_category),
            commerce_type: ActiveValue::Set(params.classification.commerce_type),
            state: ActiveValue::Set(params.state),
            validity: ActiveValue::Set(to_millis(params.validity)),
            created_date: ActiveValue::Set(to_millis(params.created_at)),
            active_date: ActiveValue::Set(params.active_at.map(to_millis)),
            updated_date: ActiveValue::Set(to_millis(params.created_at)),
            subscriber_count: ActiveValue::Set(0),
            revenue_minor: ActiveValue::Set(0),
        }
        .insert(&txn)
        .await?;

        SubscriptionRepository::new(&txn)
            .insert_papers(id, params.classification.test_type, &params.paper_ids)
            .await?;

        for tier in params.pricing {
            entity::subscription_price::ActiveModel {
                subscription_id: ActiveValue::Set(id),
                kind: ActiveValue::Set(tier.kind),
                amount_minor: ActiveValue::Set(tier.amount_minor),
                duration_days: ActiveValue::Set(tier.duration_days),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.get_by_id(id).await?.ok_or(DbErr::RecordNotFound(format!(
            "Subscription with id {} not found after creation",
            id
        )))
    }

    /// Replaces the bundle of a subscription in one transaction.
    pub async fn replace_papers(
        &self,
        id: i64,
        test_type: TestType,
        paper_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::SubscriptionPaper::delete_many()
            .filter(entity::subscription_paper::Column::SubscriptionId.eq(id))
            .exec(&txn)
            .await?;

        let repo = SubscriptionRepository::new(&txn);
        repo.insert_papers(id, test_type, paper_ids).await?;
        repo.touch(id, now).await?;

        txn.commit().await
    }

    /// Deletes a subscription with its bundle and pricing rows in one transaction.
    ///
    /// # Returns
    /// - `Ok(true)` - The subscription existed and was deleted
    /// - `Ok(false)` - No subscription with that ID
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::SubscriptionPaper::delete_many()
            .filter(entity::subscription_paper::Column::SubscriptionId.eq(id))
            .exec(&txn)
            .await?;

        entity::prelude::SubscriptionPrice::delete_many()
            .filter(entity::subscription_price::Column::SubscriptionId.eq(id))
            .exec(&txn)
            .await?;

        let result = entity::prelude::Subscription::delete_by_id(id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(result.rows_affected == 1)
    }
}
