use super::*;

/// Tests the first write for an accessible paper.
///
/// Expected: Created with the grant, its window and the paper's scoring
#[tokio::test]
async fn first_write_materializes_attempt() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = paid_bundle(db).await?;
    let grant = EntitlementFactory::new(db, "user-1", subscription.id)
        .build()
        .await?;

    let service = AttemptService::new(db);
    let write = service
        .record(params(AttemptStatus::InProgress, None), fixed_now())
        .await?;

    match write {
        AttemptWrite::Created(attempt) => {
            assert_eq!(attempt.status, AttemptStatus::InProgress);
            assert_eq!(attempt.entitlement_id, grant.id);
            assert_eq!(attempt.scoring.question_count, 50);
            assert_eq!(attempt.scoring.max_marks(), 100.0);
            assert_eq!(
                attempt.window.valid_until,
                fixed_now() + Duration::days(30)
            );
        }
        other => panic!("Expected Created, got {:?}", other),
    }

    Ok(())
}

/// Tests progress saves on a stored attempt.
///
/// Expected: Updated twice, then DONE with the final score
#[tokio::test]
async fn later_writes_update_attempt() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = fixed_now();

    let subscription = paid_bundle(db).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .build()
        .await?;

    let service = AttemptService::new(db);
    service
        .record(params(AttemptStatus::InProgress, None), now)
        .await?;

    let resumed = service
        .record(
            params(AttemptStatus::Resume, Some(12.5)),
            now + Duration::minutes(5),
        )
        .await?;
    assert!(matches!(resumed, AttemptWrite::Updated(ref a) if a.status == AttemptStatus::Resume));

    let done = service
        .record(
            params(AttemptStatus::Done, Some(74.0)),
            now + Duration::minutes(30),
        )
        .await?;

    match done {
        AttemptWrite::Updated(attempt) => {
            assert_eq!(attempt.status, AttemptStatus::Done);
            assert_eq!(attempt.score, Some(74.0));
            assert_eq!(attempt.completed_at, Some(now + Duration::minutes(30)));
        }
        other => panic!("Expected Updated, got {:?}", other),
    }

    Ok(())
}

/// Tests a write after the attempt is DONE.
///
/// Expected: IgnoredTerminal with the stored attempt unchanged
#[tokio::test]
async fn done_attempt_ignores_writes() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscription = paid_bundle(db).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .build()
        .await?;

    let service = AttemptService::new(db);
    service
        .record(params(AttemptStatus::Done, Some(88.0)), fixed_now())
        .await?;

    let write = service
        .record(params(AttemptStatus::InProgress, Some(1.0)), fixed_now())
        .await?;

    match write {
        AttemptWrite::IgnoredTerminal(attempt) => {
            assert_eq!(attempt.status, AttemptStatus::Done);
            assert_eq!(attempt.score, Some(88.0));
        }
        other => panic!("Expected IgnoredTerminal, got {:?}", other),
    }

    Ok(())
}

/// Tests writing START.
///
/// Expected: Err(ValidationError::StartNotWritable)
#[tokio::test]
async fn rejects_start() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let service = AttemptService::new(db);
    let result = service
        .record(params(AttemptStatus::Start, None), fixed_now())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::StartNotWritable))
    ));

    Ok(())
}

/// Tests a first write without a live grant.
///
/// Covers a user with no grants and a user whose only grant has expired.
///
/// Expected: Err(EntitlementError::NotEntitled) and no attempt stored
#[tokio::test]
async fn rejects_paper_without_live_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = fixed_now();

    let subscription = paid_bundle(db).await?;
    EntitlementFactory::new(db, "user-2", subscription.id)
        .window(now - Duration::days(30), now - Duration::days(1))
        .build()
        .await?;

    let service = AttemptService::new(db);

    for user_id in ["user-1", "user-2"] {
        let mut request = params(AttemptStatus::InProgress, None);
        request.user_id = user_id.to_string();

        let result = service.record(request, now).await;

        assert!(matches!(
            result,
            Err(AppError::Entitlement(EntitlementError::NotEntitled { .. }))
        ));
    }

    Ok(())
}

/// Tests progress on a stored attempt after the grant expired.
///
/// Stored attempts carry their own window, so progress is still recorded.
///
/// Expected: Updated
#[tokio::test]
async fn stored_attempt_outlives_grant() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_engine_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = fixed_now();

    let subscription = paid_bundle(db).await?;
    EntitlementFactory::new(db, "user-1", subscription.id)
        .window(now - Duration::days(1), now + Duration::hours(1))
        .build()
        .await?;

    let service = AttemptService::new(db);
    service
        .record(params(AttemptStatus::InProgress, None), now)
        .await?;

    let write = service
        .record(
            params(AttemptStatus::Done, Some(50.0)),
            now + Duration::days(2),
        )
        .await?;

    assert!(matches!(write, AttemptWrite::Updated(_)));

    Ok(())
}
