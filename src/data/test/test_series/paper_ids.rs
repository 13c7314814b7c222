use super::*;

/// Tests listing the papers of a series.
///
/// Expected: papers of the requested series in listing order
#[tokio::test]
async fn lists_papers_in_position_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TestSeriesPaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_test_series_listing(db, 1, ["S3", "S1", "S2"]).await?;
    factory::create_test_series_listing(db, 2, ["X1"]).await?;

    let repo = TestSeriesRepository::new(db);

    assert_eq!(repo.paper_ids(1).await?, vec!["S3", "S1", "S2"]);
    assert!(repo.paper_ids(3).await?.is_empty());

    Ok(())
}
