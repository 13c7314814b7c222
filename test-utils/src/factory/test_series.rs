//! Test series listing factory.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Lists papers under a test series in the given order.
///
/// # Returns
/// - `Ok(Vec<entity::test_series_paper::Model>)` - Created listing rows
/// - `Err(DbErr)` - Database error during insert
pub async fn create_test_series_listing<I, S>(
    db: &DatabaseConnection,
    subscription_id: i64,
    paper_ids: I,
) -> Result<Vec<entity::test_series_paper::Model>, DbErr>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rows = Vec::new();

    for (position, paper_id) in paper_ids.into_iter().enumerate() {
        rows.push(
            entity::test_series_paper::ActiveModel {
                subscription_id: ActiveValue::Set(subscription_id),
                paper_id: ActiveValue::Set(paper_id.into()),
                position: ActiveValue::Set(position as i32),
            }
            .insert(db)
            .await?,
        );
    }

    Ok(rows)
}
