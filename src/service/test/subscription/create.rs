use super::*;

/// Tests creating a subscription without activating it.
///
/// Expected: Ok with a DRAFT subscription and its papers unclaimed
#[tokio::test]
async fn creates_draft_without_claims() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1", "P2"]).await?;

    let service = SubscriptionService::new(db);
    let subscription = service
        .create(params("Banking Mock Pack", &["P1", "P2"]), fixed_now())
        .await?;

    assert_eq!(subscription.id, 1);
    assert_eq!(subscription.state, SubscriptionState::Draft);
    assert_eq!(subscription.paper_ids, vec!["P1", "P2"]);
    assert!(subscription.active_at.is_none());
    assert_eq!(holder_of(db, "P1").await?, None);
    assert_eq!(holder_of(db, "P2").await?, None);

    Ok(())
}

/// Tests creating and activating a subscription in one call.
///
/// Expected: Ok with an ACTIVE subscription holding every paper
#[tokio::test]
async fn activates_immediately_when_requested() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1", "P2"]).await?;

    let mut request = params("Banking Mock Pack", &["P1", "P2"]);
    request.activate_immediately = true;

    let service = SubscriptionService::new(db);
    let subscription = service.create(request, fixed_now()).await?;

    assert_eq!(subscription.state, SubscriptionState::Active);
    assert_eq!(subscription.active_at, Some(fixed_now()));
    assert_eq!(holder_of(db, "P1").await?, Some(subscription.id));
    assert_eq!(holder_of(db, "P2").await?, Some(subscription.id));

    Ok(())
}

/// Tests duplicate paper IDs in the bundle.
///
/// Expected: each paper kept once at its first position
#[tokio::test]
async fn collapses_duplicate_papers() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1", "P2"]).await?;

    let service = SubscriptionService::new(db);
    let subscription = service
        .create(params("Banking Mock Pack", &["P2", "P1", "P2"]), fixed_now())
        .await?;

    assert_eq!(subscription.paper_ids, vec!["P2", "P1"]);

    Ok(())
}

/// Tests a bundle naming a paper missing from the catalog.
///
/// Expected: Err(AppError::NotFound) and nothing persisted
#[tokio::test]
async fn fails_for_unknown_paper() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1"]).await?;

    let service = SubscriptionService::new(db);
    let result = service
        .create(params("Banking Mock Pack", &["P1", "P9"]), fixed_now())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(service.get_by_id(1).await?.is_none());

    Ok(())
}

/// Tests a bundle naming a paper held by an active subscription.
///
/// Expected: Err(SubscriptionError::PapersClaimed) naming the holder
#[tokio::test]
async fn fails_for_claimed_paper() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (holder, papers) = create_active_subscription(db, TestType::Paid, 1).await?;
    create_papers(db, &["P1"]).await?;

    let service = SubscriptionService::new(db);
    let result = service
        .create(
            params("Banking Mock Pack", &["P1", papers[0].id.as_str()]),
            fixed_now(),
        )
        .await;

    match result {
        Err(AppError::Subscription(SubscriptionError::PapersClaimed { conflicts })) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].paper_id, papers[0].id);
            assert_eq!(conflicts[0].subscription_id, Some(holder.id));
        }
        other => panic!("Expected PapersClaimed, got {:?}", other),
    }

    Ok(())
}

/// Tests an incomplete definition.
///
/// Expected: Err(ValidationError::MissingPricing) for a PAID subscription without tiers
#[tokio::test]
async fn fails_validation() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1"]).await?;

    let mut request = params("Banking Mock Pack", &["P1"]);
    request.pricing.clear();

    let service = SubscriptionService::new(db);
    let result = service.create(request, fixed_now()).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::MissingPricing))
    ));

    Ok(())
}

/// Tests immediate activation with two pricing tiers of the same kind.
///
/// Expected: Err(ValidationError::InvalidPricing), nothing persisted and no claims
#[tokio::test]
async fn rejects_repeated_price_kind() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    create_papers(db, &["P1", "P2"]).await?;

    let mut request = params("Banking Mock Pack", &["P1", "P2"]);
    request.activate_immediately = true;
    request.pricing.push(PriceTier {
        kind: EntitlementKind::Subscription,
        amount_minor: 39_900,
        duration_days: 60,
    });

    let service = SubscriptionService::new(db);
    let result = service.create(request, fixed_now()).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidPricing {
            kind: EntitlementKind::Subscription
        }))
    ));
    assert!(service.get_by_id(1).await?.is_none());
    assert_eq!(holder_of(db, "P1").await?, None);
    assert_eq!(holder_of(db, "P2").await?, None);

    Ok(())
}
