use super::*;

/// Tests replacing a series listing.
///
/// Expected: the old listing is gone and the new one is in order
#[tokio::test]
async fn replaces_listing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TestSeriesPaper)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_test_series_listing(db, 1, ["S1", "S2"]).await?;

    let repo = TestSeriesRepository::new(db);
    repo.replace(1, &["S2".to_string(), "S4".to_string()])
        .await?;

    assert_eq!(repo.paper_ids(1).await?, vec!["S2", "S4"]);

    Ok(())
}
