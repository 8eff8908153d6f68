//! # Seed Data Generator
//!
//! Populates a database with demo categories, products, movements and an
//! employee account.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockroom_dev.db
//! cargo run -p stockroom-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! The bootstrap admin (`admin` / `admin123`) is created by the normal
//! startup path. The seed adds `clerk` / `clerk123` as an EMPLOYEE.

use std::env;
use stockroom_core::{ChangeType, Money, NewProduct, Role};
use stockroom_db::{Database, DbConfig};

/// Categories and their products: (name, quantity, price in cents).
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Tools",
        &[
            ("Hammer", 10, 999),
            ("Screwdriver Set", 25, 1450),
            ("Hand Saw", 8, 2199),
            ("Tape Measure", 40, 650),
        ],
    ),
    (
        "Fasteners",
        &[
            ("Wood Screws 100pk", 120, 499),
            ("Wall Anchors 50pk", 60, 375),
            ("Hex Bolts M8 20pk", 35, 820),
        ],
    ),
    (
        "Paint",
        &[
            ("Interior White 5L", 14, 3899),
            ("Primer 1L", 22, 1199),
            ("Roller Kit", 18, 1575),
        ],
    ),
    (
        "Electrical",
        &[
            ("Extension Cord 5m", 16, 1299),
            ("LED Bulb E27", 200, 249),
        ],
    ),
];

/// Demo movements: (product name, direction, quantity).
const MOVEMENTS: &[(&str, ChangeType, i64)] = &[
    ("Hammer", ChangeType::Out, 3),
    ("LED Bulb E27", ChangeType::Out, 48),
    ("Wood Screws 100pk", ChangeType::In, 60),
    ("Interior White 5L", ChangeType::Out, 4),
    ("Tape Measure", ChangeType::Out, 5),
    ("Primer 1L", ChangeType::In, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut created = 0;
    for (category_name, products) in CATALOG {
        let category = db.categories().create(category_name).await?;
        for (name, quantity, price_cents) in products.iter() {
            let product = NewProduct::new(*name, category.id, *quantity, Money::from_cents(*price_cents));
            if let Err(e) = db.products().create(product).await {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }
            created += 1;
        }
    }
    println!("✓ Created {} categories, {} products", CATALOG.len(), created);

    let ledger = db.ledger();
    for (name, change_type, quantity) in MOVEMENTS {
        match db.products().find_by_name(name).await? {
            Some(product) => {
                ledger.record_movement(product.id, *change_type, *quantity).await?;
            }
            None => eprintln!("Skipping movement for missing product {}", name),
        }
    }
    println!("✓ Recorded {} stock movements", MOVEMENTS.len());

    if !db.users().exists("clerk").await? {
        db.access().register("clerk", "clerk123", Role::Employee).await?;
        println!("✓ Registered employee 'clerk'");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
