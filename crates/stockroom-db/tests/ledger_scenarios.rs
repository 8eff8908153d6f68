//! End-to-end scenarios against an in-memory database.

use stockroom_core::{ChangeType, CoreError, Money, NewProduct, ProductUpdate, Role, StockPolicy};
use stockroom_db::{Database, DbConfig, DbError, ErrorKind};

async fn fresh() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn tools_and_hammer(db: &Database) -> (i64, i64) {
    let tools = db.categories().create("Tools").await.unwrap();
    let hammer = db
        .products()
        .create(NewProduct::new(
            "Hammer",
            tools.id,
            10,
            "9.99".parse::<Money>().unwrap(),
        ))
        .await
        .unwrap();
    (tools.id, hammer.id)
}

#[tokio::test]
async fn hammer_scenario() {
    let db = fresh().await;
    let (tools, hammer) = tools_and_hammer(&db).await;

    assert_eq!(tools, 1);

    db.ledger()
        .record_movement(hammer, ChangeType::Out, 3)
        .await
        .unwrap();

    let product = db.products().get_by_id(hammer).await.unwrap();
    assert_eq!(product.quantity, 7);
    assert_eq!(product.price_cents, 999);

    let history = db.ledger().list_for_product(hammer).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ChangeType::Out);
    assert_eq!(history[0].quantity, 3);

    // Default policy lets the balance go negative.
    db.ledger()
        .record_movement(hammer, ChangeType::Out, 1000)
        .await
        .unwrap();
    assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, -993);
}

#[tokio::test]
async fn in_then_out_restores_quantity() {
    let db = fresh().await;
    let (_, hammer) = tools_and_hammer(&db).await;
    let ledger = db.ledger();

    for q in [1, 5, 250] {
        let before = db.products().get_by_id(hammer).await.unwrap().quantity;
        let rows_before = ledger.count().await.unwrap();

        ledger.record_movement(hammer, ChangeType::In, q).await.unwrap();
        ledger.record_movement(hammer, ChangeType::Out, q).await.unwrap();

        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, before);
        assert_eq!(ledger.count().await.unwrap(), rows_before + 2);
    }
}

#[tokio::test]
async fn quantity_matches_initial_plus_net_movements() {
    let db = fresh().await;
    let (_, hammer) = tools_and_hammer(&db).await;
    let ledger = db.ledger();

    let moves = [
        (ChangeType::In, 4),
        (ChangeType::Out, 9),
        (ChangeType::In, 2),
        (ChangeType::Out, 12),
    ];
    for (change_type, q) in moves {
        ledger.record_movement(hammer, change_type, q).await.unwrap();
    }

    let net = ledger.net_change(hammer).await.unwrap();
    let quantity = db.products().get_by_id(hammer).await.unwrap().quantity;
    assert_eq!(net, -15);
    assert_eq!(quantity, 10 + net);
}

#[tokio::test]
async fn unknown_product_leaves_movements_untouched() {
    let db = fresh().await;
    let (_, hammer) = tools_and_hammer(&db).await;
    db.ledger()
        .record_movement(hammer, ChangeType::In, 1)
        .await
        .unwrap();

    let before = db.ledger().list_all().await.unwrap();
    let err = db
        .ledger()
        .record_movement(hammer + 100, ChangeType::Out, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(_))));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(db.ledger().list_all().await.unwrap(), before);
}

#[tokio::test]
async fn failed_insert_rolls_back_quantity_update() {
    let db = fresh().await;
    let (_, hammer) = tools_and_hammer(&db).await;
    sqlx::query(
        "CREATE TRIGGER refuse_movements BEFORE INSERT ON stock_movements \
         BEGIN SELECT RAISE(ABORT, 'movement log unavailable'); END",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let err = db
        .ledger()
        .record_movement(hammer, ChangeType::Out, 3)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::TransactionFailed(_)));
    assert_eq!(err.kind(), ErrorKind::TransactionFailure);
    assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 10);
    assert_eq!(db.ledger().count().await.unwrap(), 0);
}

#[tokio::test]
async fn reject_insufficient_policy_from_config() {
    let db = Database::new(DbConfig::in_memory().stock_policy(StockPolicy::RejectInsufficient))
        .await
        .unwrap();
    let (_, hammer) = tools_and_hammer(&db).await;
    db.ledger()
        .record_movement(hammer, ChangeType::Out, 3)
        .await
        .unwrap();

    let err = db
        .ledger()
        .record_movement(hammer, ChangeType::Out, 1000)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientStock {
            available: 7,
            requested: 1000,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 7);
    assert_eq!(db.ledger().count().await.unwrap(), 1);
}

#[tokio::test]
async fn empty_update_changes_nothing() {
    let db = fresh().await;
    let (_, hammer) = tools_and_hammer(&db).await;
    let before = db.products().get_by_id(hammer).await.unwrap();

    let err = db
        .products()
        .update(hammer, ProductUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Domain(CoreError::NothingToUpdate)));
    assert_eq!(db.products().get_by_id(hammer).await.unwrap(), before);
}

#[tokio::test]
async fn only_admin_cannot_be_deleted() {
    let db = fresh().await;
    let access = db.access();
    access.register("boss", "pw", Role::Admin).await.unwrap();
    access.register("clerk", "pw", Role::Employee).await.unwrap();

    for acting in ["clerk", "anyone", "ghost"] {
        let err = access.delete_user(acting, "boss").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::LastAdmin)));
    }
    assert!(db.users().exists("boss").await.unwrap());
}

#[tokio::test]
async fn authenticate_never_leaks_which_part_failed() {
    let db = fresh().await;
    let access = db.access();
    access.register("clerk", "secret", Role::Employee).await.unwrap();

    assert!(access.authenticate("clerk", "secret").await.unwrap());
    assert!(!access.authenticate("clerk", "Secret").await.unwrap());
    assert!(!access.authenticate("nobody", "secret").await.unwrap());
}

#[tokio::test]
async fn bootstrap_admin_runs_once_on_a_file_database() {
    let dir = std::env::temp_dir().join(format!("stockroom-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bootstrap.db");
    let _ = std::fs::remove_file(&path);

    let first = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(first.users().count_admins().await.unwrap(), 1);
    assert!(first.access().authenticate("admin", "admin123").await.unwrap());
    first.close().await;

    let second = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(second.users().list_all().await.unwrap().len(), 1);
    second.close().await;

    let _ = std::fs::remove_dir_all(&dir);
}
