use super::*;

/// Tests loading several papers where some IDs are unknown.
///
/// Expected: only the existing papers of the requested test type are returned
#[tokio::test]
async fn skips_unknown_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(SellablePaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let paper = factory::create_paper(db, TestType::Paid).await?;
    SellablePaperFactory::new(db, TestType::Quiz)
        .id("Q1")
        .build()
        .await?;

    let repo = SellablePaperRepository::new(db);
    let papers = repo
        .find_many(
            TestType::Paid,
            &[paper.id.clone(), "Q1".to_string(), "missing".to_string()],
        )
        .await?;

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].id, paper.id);
    assert_eq!(papers[0].scoring.question_count, 100);

    Ok(())
}

/// Tests loading with no IDs.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn returns_empty_for_no_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(SellablePaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SellablePaperRepository::new(db);

    assert!(repo.find_many(TestType::Paid, &[]).await?.is_empty());

    Ok(())
}
