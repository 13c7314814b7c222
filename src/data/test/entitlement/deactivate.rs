use super::*;

/// Tests deactivating a grant.
///
/// The row is kept; only the active flag changes, so the grant stops being live.
///
/// Expected: Ok(true) and the grant no longer live
#[tokio::test]
async fn deactivated_grant_is_not_live() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(Entitlement)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let grant = EntitlementFactory::new(db, "user-1", 1).build().await?;

    let repo = EntitlementRepository::new(db);
    assert!(repo.deactivate(grant.id).await?);

    let stored = repo.get_by_id(grant.id).await?.unwrap();
    assert!(!stored.active);
    assert!(repo.find_live("user-1", fixed_now()).await?.is_empty());

    Ok(())
}

/// Tests deactivating a grant that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_grant() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(Entitlement)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = EntitlementRepository::new(db);

    assert!(!repo.deactivate(404).await?);

    Ok(())
}
