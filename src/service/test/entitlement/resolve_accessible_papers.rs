use super::*;

/// Tests a DAY grant followed by a SUBSCRIPTION grant on the same bundle.
///
/// P1 keeps its first position but is authorized by the newer SUBSCRIPTION grant.
///
/// Expected: [P1, P2], both under the SUBSCRIPTION grant
#[tokio::test]
async fn later_grant_wins_for_shared_paper() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = fixed_now();

    let subscription = active_bundle(db, TestType::Paid, &["P1", "P2"]).await?;

    let service = EntitlementService::new(db);
    service
        .grant(
            request(
                subscription.id,
                EntitlementKind::Day,
                Some("P1"),
                now - Duration::hours(2),
                1,
            ),
            now,
        )
        .await?;
    let broad = service
        .grant(
            request(
                subscription.id,
                EntitlementKind::Subscription,
                None,
                now - Duration::hours(1),
                30,
            ),
            now,
        )
        .await?;

    let papers = service
        .resolve_accessible_papers("user-1", now, &ClassificationFilter::default())
        .await?;

    let paper_ids: Vec<&str> = papers.iter().map(|p| p.paper_id.as_str()).collect();
    assert_eq!(paper_ids, vec!["P1", "P2"]);
    assert!(papers
        .iter()
        .all(|p| p.entitlement_id == broad.entitlement().id));
    assert_eq!(papers[0].window, broad.entitlement().window);

    Ok(())
}

/// Tests a TEST_SERIES grant.
///
/// Expected: the series listing in order, not the bundle
#[tokio::test]
async fn test_series_grant_covers_listing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = active_bundle(db, TestType::Paid, &["P1"]).await?;
    factory::create_test_series_listing(db, subscription.id, ["S2", "S1"]).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .kind(EntitlementKind::TestSeries)
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let papers = service
        .resolve_accessible_papers("user-1", fixed_now(), &ClassificationFilter::default())
        .await?;

    let paper_ids: Vec<&str> = papers.iter().map(|p| p.paper_id.as_str()).collect();
    assert_eq!(paper_ids, vec!["S2", "S1"]);
    assert!(papers
        .iter()
        .all(|p| p.kind == EntitlementKind::TestSeries));

    Ok(())
}

/// Tests that expired and inactive grants give no access.
///
/// Expected: empty list
#[tokio::test]
async fn ignores_grants_that_are_not_live() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = fixed_now();

    let subscription = active_bundle(db, TestType::Paid, &["P1"]).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .window(now - Duration::days(31), now - Duration::days(1))
        .build()
        .await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .active(false)
        .build()
        .await?;

    let service = EntitlementService::new(db);
    let papers = service
        .resolve_accessible_papers("user-1", now, &ClassificationFilter::default())
        .await?;

    assert!(papers.is_empty());

    Ok(())
}

/// Tests narrowing access by test type.
///
/// Expected: only the QUIZ paper
#[tokio::test]
async fn filters_by_classification() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let paid = active_bundle(db, TestType::Paid, &["P1"]).await?;
    let quiz = active_bundle(db, TestType::Quiz, &["Q1"]).await?;
    factory::create_entitlement(db, "user-1", paid.id).await?;
    factory::create_entitlement(db, "user-1", quiz.id).await?;

    let service = EntitlementService::new(db);
    let papers = service
        .resolve_accessible_papers(
            "user-1",
            fixed_now(),
            &ClassificationFilter::test_type(TestType::Quiz),
        )
        .await?;

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].paper_id, "Q1");
    assert_eq!(papers[0].test_type, TestType::Quiz);

    Ok(())
}
