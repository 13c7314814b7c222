use super::*;

/// Tests listing papers available for new bundles.
///
/// Claimed papers and papers not yet approved are excluded.
///
/// Expected: only the unclaimed approved paper
#[tokio::test]
async fn lists_only_unclaimed_approved_papers() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(SellablePaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let available = factory::create_paper(db, TestType::Paid).await?;
    SellablePaperFactory::new(db, TestType::Paid)
        .claimed_by(10)
        .build()
        .await?;
    SellablePaperFactory::new(db, TestType::Paid)
        .status(PaperState::Draft)
        .build()
        .await?;

    let repo = SellablePaperRepository::new(db);
    let papers = repo.list_claimable(TestType::Paid, None, None).await?;

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].id, available.id);

    Ok(())
}

/// Tests narrowing the listing by category and sub-category.
///
/// Expected: only papers matching both constraints
#[tokio::test]
async fn filters_by_classification() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(SellablePaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let clerk = SellablePaperFactory::new(db, TestType::Paid)
        .sub_category("CLERK")
        .build()
        .await?;
    factory::create_paper(db, TestType::Paid).await?;
    SellablePaperFactory::new(db, TestType::Paid)
        .category("SSC")
        .sub_category("CLERK")
        .build()
        .await?;

    let repo = SellablePaperRepository::new(db);
    let papers = repo
        .list_claimable(TestType::Paid, Some("BANKING"), Some("CLERK"))
        .await?;

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].id, clerk.id);

    Ok(())
}
