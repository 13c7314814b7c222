use super::*;

/// Tests paging through filtered subscriptions.
///
/// Expected: 3 matching subscriptions over 2 pages of 2
#[tokio::test]
async fn computes_total_pages() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..3 {
        SubscriptionFactory::new(db, TestType::Paid)
            .state(SubscriptionState::Active)
            .build()
            .await?;
    }
    SubscriptionFactory::new(db, TestType::Quiz)
        .state(SubscriptionState::Active)
        .build()
        .await?;

    let service = SubscriptionService::new(db);
    let filter = ClassificationFilter::test_type(TestType::Paid);

    let first = service
        .get_paginated(&filter, Some(SubscriptionState::Active), 0, 2)
        .await?;
    let second = service
        .get_paginated(&filter, Some(SubscriptionState::Active), 1, 2)
        .await?;

    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.subscriptions.len(), 2);
    assert_eq!(second.subscriptions.len(), 1);

    Ok(())
}

/// Tests a page request with no matches.
///
/// Expected: empty page with zero totals
#[tokio::test]
async fn empty_result_has_no_pages() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    SubscriptionFactory::new(db, TestType::Paid).build().await?;

    let service = SubscriptionService::new(db);
    let page = service
        .get_paginated(
            &ClassificationFilter::test_type(TestType::Paid),
            Some(SubscriptionState::Active),
            0,
            10,
        )
        .await?;

    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.subscriptions.is_empty());

    Ok(())
}
