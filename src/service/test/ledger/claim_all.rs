use super::*;

/// Tests claiming free papers.
///
/// Expected: Ok and every paper held by the subscription
#[tokio::test]
async fn claims_every_paper() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    SellablePaperFactory::new(db, TestType::Paid).id("P1").build().await?;
    SellablePaperFactory::new(db, TestType::Paid).id("P2").build().await?;

    let ledger = LedgerService::new(db);
    ledger
        .claim_all(TestType::Paid, &ids(&["P1", "P2"]), 7)
        .await?;

    let papers = crate::data::paper::SellablePaperRepository::new(db)
        .find_many(TestType::Paid, &ids(&["P1", "P2"]))
        .await?;

    assert_eq!(papers.len(), 2);
    assert!(papers.iter().all(|p| p.claimed && p.claimed_by == Some(7)));

    Ok(())
}

/// Tests claiming papers the subscription already holds.
///
/// Expected: Ok without conflicts
#[tokio::test]
async fn treats_own_claims_as_claimed() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    SellablePaperFactory::new(db, TestType::Paid)
        .id("P1")
        .claimed_by(7)
        .build()
        .await?;
    SellablePaperFactory::new(db, TestType::Paid).id("P2").build().await?;

    let ledger = LedgerService::new(db);

    assert!(ledger
        .claim_all(TestType::Paid, &ids(&["P1", "P2"]), 7)
        .await
        .is_ok());

    Ok(())
}

/// Tests a claim that loses one paper to another holder.
///
/// The claim on P1 taken by the call is released again before the conflict is
/// reported.
///
/// Expected: Err(PapersClaimed) for P2 and P1 left unclaimed
#[tokio::test]
async fn releases_taken_claims_on_conflict() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    SellablePaperFactory::new(db, TestType::Paid).id("P1").build().await?;
    SellablePaperFactory::new(db, TestType::Paid)
        .id("P2")
        .claimed_by(99)
        .build()
        .await?;

    let ledger = LedgerService::new(db);
    let result = ledger
        .claim_all(TestType::Paid, &ids(&["P1", "P2"]), 7)
        .await;

    match result {
        Err(AppError::Subscription(SubscriptionError::PapersClaimed { conflicts })) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].paper_id, "P2");
            assert_eq!(conflicts[0].subscription_id, Some(99));
        }
        other => panic!("Expected PapersClaimed, got {:?}", other),
    }

    let p1 = crate::data::paper::SellablePaperRepository::new(db)
        .get_by_id(TestType::Paid, "P1")
        .await?
        .unwrap();
    assert!(!p1.claimed);
    assert!(p1.claimed_by.is_none());

    Ok(())
}
