use super::*;

/// Tests granting a SUBSCRIPTION entitlement.
///
/// Expected: Ok(Created) with the first entitlement ID
#[tokio::test]
async fn creates_subscription_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;

    let service = EntitlementService::new(db);
    let outcome = service
        .grant(
            request(subscription.id, EntitlementKind::Subscription, None, fixed_now(), 30),
            fixed_now(),
        )
        .await?;

    match outcome {
        GrantOutcome::Created(entitlement) => {
            assert_eq!(entitlement.id, 1);
            assert_eq!(entitlement.subscription_id, subscription.id);
            assert!(entitlement.active);
            assert_eq!(entitlement.window.valid_from, fixed_now());
        }
        other => panic!("Expected Created, got {:?}", other),
    }

    Ok(())
}

/// Tests a DAY grant when a live SUBSCRIPTION grant covers the bundle.
///
/// Expected: Ok(AlreadyCovered) with the broader grant and nothing persisted
#[tokio::test]
async fn day_grant_is_covered_by_broader_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;
    let broad = EntitlementFactory::new(db, "user-1", subscription.id)
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let outcome = service
        .grant(
            request(subscription.id, EntitlementKind::Day, Some("P1"), fixed_now(), 1),
            fixed_now(),
        )
        .await?;

    assert!(matches!(outcome, GrantOutcome::AlreadyCovered(ref e) if e.id == broad.id));
    assert_eq!(
        service
            .resolve_live("user-1", fixed_now(), &ClassificationFilter::default())
            .await?
            .len(),
        1
    );

    Ok(())
}

/// Tests a second live DAY grant for the same paper.
///
/// Expected: Err(EntitlementError::DuplicateDayGrant) naming the existing grant
#[tokio::test]
async fn rejects_duplicate_day_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;
    let existing = EntitlementFactory::new(db, "user-1", subscription.id)
        .kind(EntitlementKind::Day)
        .paper_id("P1")
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let result = service
        .grant(
            request(subscription.id, EntitlementKind::Day, Some("P1"), fixed_now(), 1),
            fixed_now(),
        )
        .await;

    match result {
        Err(AppError::Entitlement(EntitlementError::DuplicateDayGrant {
            paper_id,
            entitlement_id,
            ..
        })) => {
            assert_eq!(paper_id, "P1");
            assert_eq!(entitlement_id, existing.id);
        }
        other => panic!("Expected DuplicateDayGrant, got {:?}", other),
    }

    Ok(())
}

/// Tests a DAY grant when the user holds both a live DAY grant for the paper and
/// a live broader grant.
///
/// The broader grant takes precedence over the duplicate check.
///
/// Expected: Ok(AlreadyCovered) with the broader grant
#[tokio::test]
async fn broader_grant_wins_over_duplicate_day_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .kind(EntitlementKind::Day)
        .paper_id("P1")
        .build()
        .await?;
    let broad = EntitlementFactory::new(db, "user-1", subscription.id)
        .kind(EntitlementKind::TestSeries)
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let outcome = service
        .grant(
            request(subscription.id, EntitlementKind::Day, Some("P1"), fixed_now(), 1),
            fixed_now(),
        )
        .await?;

    assert!(matches!(outcome, GrantOutcome::AlreadyCovered(ref e) if e.id == broad.id));

    Ok(())
}

/// Tests a DAY grant for another paper of the bundle.
///
/// Expected: Ok(Created) since DAY grants only collide per paper
#[tokio::test]
async fn allows_day_grant_for_other_paper() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .kind(EntitlementKind::Day)
        .paper_id("P1")
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let outcome = service
        .grant(
            request(subscription.id, EntitlementKind::Day, Some("P2"), fixed_now(), 1),
            fixed_now(),
        )
        .await?;

    assert!(matches!(outcome, GrantOutcome::Created(_)));

    Ok(())
}

/// Tests DAY grant parameter validation.
///
/// Expected: DayGrantRequiresPaper, PaperNotInBundle and PaperIdNotAllowed
#[tokio::test]
async fn validates_paper_parameter() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1"]).await?;
    let service = EntitlementService::new(db);

    let missing = service
        .grant(
            request(subscription.id, EntitlementKind::Day, None, fixed_now(), 1),
            fixed_now(),
        )
        .await;
    assert!(matches!(
        missing,
        Err(AppError::Validation(ValidationError::DayGrantRequiresPaper))
    ));

    let foreign = service
        .grant(
            request(subscription.id, EntitlementKind::Day, Some("P9"), fixed_now(), 1),
            fixed_now(),
        )
        .await;
    assert!(matches!(
        foreign,
        Err(AppError::Validation(ValidationError::PaperNotInBundle { .. }))
    ));

    let scoped = service
        .grant(
            request(
                subscription.id,
                EntitlementKind::Subscription,
                Some("P1"),
                fixed_now(),
                30,
            ),
            fixed_now(),
        )
        .await;
    assert!(matches!(
        scoped,
        Err(AppError::Validation(ValidationError::PaperIdNotAllowed {
            kind: EntitlementKind::Subscription
        }))
    ));

    Ok(())
}

/// Tests granting under a subscription that cannot be sold.
///
/// Covers a DRAFT subscription and an ACTIVE one past its deadline.
///
/// Expected: Err(EntitlementError::SubscriptionUnavailable) for both
#[tokio::test]
async fn rejects_unavailable_subscription() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let draft = SubscriptionFactory::new(db, TestType::Paid)
        .papers(["P1"])
        .build()
        .await?;
    let expired = SubscriptionFactory::new(db, TestType::Paid)
        .state(SubscriptionState::Active)
        .papers(["P2"])
        .validity(fixed_now() - Duration::days(1))
        .build()
        .await?;

    let service = EntitlementService::new(db);

    for subscription_id in [draft.id, expired.id] {
        let result = service
            .grant(
                request(subscription_id, EntitlementKind::Subscription, None, fixed_now(), 30),
                fixed_now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Entitlement(EntitlementError::SubscriptionUnavailable { subscription_id: id }))
                if id == subscription_id
        ));
    }

    Ok(())
}

/// Tests a window that ends before it starts.
///
/// Expected: Err(ValidationError::InvalidWindow)
#[tokio::test]
async fn rejects_inverted_window() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1"]).await?;

    let service = EntitlementService::new(db);
    let result = service
        .grant(
            request(subscription.id, EntitlementKind::Subscription, None, fixed_now(), -1),
            fixed_now(),
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidWindow))
    ));

    Ok(())
}
