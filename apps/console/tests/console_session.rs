//! Scripted console sessions against an in-memory database.

use stockroom_console::{Console, ConfigState};
use stockroom_core::{ChangeType, Role, StockPolicy};
use stockroom_db::{Database, DbConfig};

async fn database(config: DbConfig) -> Database {
    let db = Database::new(config).await.unwrap();
    db.access().register("boss", "pw", Role::Admin).await.unwrap();
    db
}

async fn run(db: &Database, config: ConfigState, lines: &[&str]) -> String {
    let mut script = lines.join("\n");
    script.push('\n');

    let mut console = Console::new(db.clone(), config, script.as_bytes(), Vec::new());
    console.run().await.unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

#[tokio::test]
async fn admin_builds_catalog_and_ships_stock() {
    let db = database(DbConfig::in_memory()).await;

    let out = run(
        &db,
        ConfigState::default(),
        &[
            "1", "boss", "pw",
            // Manage Categories > Add New Category > Back
            "3", "2", "Tools", "7",
            // Manage Products > Add New Product > Back
            "2", "2", "Hammer", "1", "10", "9.99", "8",
            // Manage Stock Movements > Record > List > Back
            "4", "2", "1", "out", "3", "1", "8",
            // Manage Products > List > Find Product by ID or Name > Back
            "2", "1", "6", "hammer", "8",
            // Logout, Exit
            "5", "3",
        ],
    )
    .await;

    assert!(out.contains("You are logged in successfully as: ADMIN"));
    assert!(out.contains("Added category successfully: #1 Tools"));
    assert!(out.contains("Product added successfully"));
    assert!(out.contains("Stock movement recorded successfully"));
    assert!(out.contains("#1 Hammer (category 1) qty 7 @ 9.99"));
    assert!(out.contains("Total stock value: 69.93"));
    assert!(out.contains("Logged out successfully."));

    let history = db.ledger().list_for_product(1).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ChangeType::Out);
    assert_eq!(history[0].quantity, 3);
}

#[tokio::test]
async fn employee_menu_has_no_user_management() {
    let db = database(DbConfig::in_memory()).await;
    db.access().register("clerk", "pw", Role::Employee).await.unwrap();

    let out = run(&db, ConfigState::default(), &["1", "clerk", "pw", "4", "3"]).await;

    assert!(out.contains("----- EMPLOYEE MENU -----"));
    assert!(!out.contains("Manage Users"));
    assert!(out.contains("4. Logout"));
    assert!(out.contains("Logged out successfully."));
}

#[tokio::test]
async fn register_from_main_menu() {
    let db = database(DbConfig::in_memory()).await;

    let out = run(
        &db,
        ConfigState::default(),
        &[
            "2", "manager", "x", "y",
            "2", "employee", "newbie", "secret",
            "2", "employee", "newbie", "again",
            "3",
        ],
    )
    .await;

    assert!(out.contains("Error: Invalid role. Please choose 'admin' or 'employee'."));
    assert!(out.contains("User 'newbie' registered successfully as EMPLOYEE."));
    assert!(out.contains("Error: Username 'newbie' already exists"));
    assert!(db.access().authenticate("newbie", "secret").await.unwrap());
}

#[tokio::test]
async fn rejected_out_movement_is_reported() {
    let db = database(DbConfig::in_memory().stock_policy(StockPolicy::RejectInsufficient)).await;
    let tools = db.categories().create("Tools").await.unwrap();
    db.products()
        .create(stockroom_core::NewProduct::new(
            "Hammer",
            tools.id,
            2,
            stockroom_core::Money::from_cents(999),
        ))
        .await
        .unwrap();

    let out = run(
        &db,
        ConfigState::default(),
        &["1", "boss", "pw", "4", "2", "1", "OUT", "5", "8", "5", "3"],
    )
    .await;

    assert!(out.contains("Error: Insufficient stock"));
    assert_eq!(db.products().get_by_id(1).await.unwrap().quantity, 2);
    assert_eq!(db.ledger().count().await.unwrap(), 0);
}
