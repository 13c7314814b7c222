use super::*;

/// Tests bumping the cached sales counters.
///
/// Expected: subscriber count and revenue accumulate over two sales
#[tokio::test]
async fn accumulates_sales() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = factory::create_subscription(db, TestType::Paid, ["P1"]).await?;

    let repo = SubscriptionRepository::new(db);
    repo.record_sale(subscription.id, 49_900, fixed_now()).await?;
    repo.record_sale(subscription.id, 4_900, fixed_now()).await?;

    let stored = repo.get_by_id(subscription.id).await?.unwrap();
    assert_eq!(stored.subscriber_count, 2);
    assert_eq!(stored.revenue_minor, 54_800);

    Ok(())
}
