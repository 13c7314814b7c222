use super::*;

/// Tests completing a pending purchase.
///
/// Expected: Ok(true) with status COMPLETED and the entitlement recorded
#[tokio::test]
async fn completes_pending_purchase() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(Purchase)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let later = fixed_now() + Duration::minutes(1);

    let repo = PurchaseRepository::new(db);
    repo.create(new_purchase(1)).await?;

    let settled = repo
        .set_outcome(1, PurchaseStatus::Completed, Some(42), later)
        .await?;

    assert!(settled);

    let stored = repo.get_by_id(1).await?.unwrap();
    assert_eq!(stored.status, PurchaseStatus::Completed);
    assert_eq!(stored.entitlement_id, Some(42));
    assert_eq!(stored.updated_at, later);

    Ok(())
}

/// Tests that a settled purchase keeps its outcome.
///
/// Expected: Ok(false) and the purchase stays COMPLETED
#[tokio::test]
async fn settled_purchase_is_not_changed() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(Purchase)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PurchaseRepository::new(db);
    repo.create(new_purchase(1)).await?;
    repo.set_outcome(1, PurchaseStatus::Completed, Some(42), fixed_now())
        .await?;

    let settled = repo
        .set_outcome(1, PurchaseStatus::Failed, None, fixed_now())
        .await?;

    assert!(!settled);
    assert_eq!(
        repo.get_by_id(1).await?.unwrap().status,
        PurchaseStatus::Completed
    );

    Ok(())
}
