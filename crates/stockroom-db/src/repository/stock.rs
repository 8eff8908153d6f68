//! # Stock Ledger
//!
//! Records IN/OUT movements and keeps `products.quantity` in step with them.
//!
//! ## One Movement, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_movement(product_id, OUT, 3)                                    │
//! │       │                                                                 │
//! │       ├── outside 1..=i32::MAX ?  ──► InvalidQuantity (no database call)│
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET quantity = quantity - 3 WHERE id = ?               │
//! │       │            AND quantity >= 3 under RejectInsufficient,          │
//! │       │            otherwise a bound that keeps the sum inside i64      │
//! │       │                                                                 │
//! │       ├── 0 rows ──► ROLLBACK ──► ProductNotFound / InsufficientStock  │
//! │       ▼                                                                 │
//! │  INSERT INTO stock_movements (...)                                      │
//! │       │                                                                 │
//! │       ├── error ──► ROLLBACK ──► TransactionFailed                      │
//! │       ▼                                                                 │
//! │  COMMIT ──► StockMovement                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The balance update is relative (`quantity = quantity ± n`), so two
//! concurrent movements never overwrite each other. Under
//! [`StockPolicy::AllowNegative`] concurrent OUTs may still take the balance
//! below zero; that is accepted behavior for that policy.
//!
//! All read queries return newest first, with the id breaking ties between
//! movements stamped in the same instant.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use stockroom_core::validation::validate_movement_quantity;
use stockroom_core::{ChangeType, CoreError, StockMovement, StockPolicy};
use tracing::{debug, info, warn};

use super::logged;
use crate::error::{DbError, DbResult};

/// A statement failing between BEGIN and COMMIT. The transaction is dropped
/// without committing, so SQLite rolls back whatever already ran.
fn in_transaction(operation: &'static str) -> impl Fn(sqlx::Error) -> DbError {
    move |err| {
        warn!(operation, error = %err, "Statement failed inside ledger transaction; rolling back");
        DbError::TransactionFailed(err.to_string())
    }
}

const MOVEMENT_COLUMNS: &str = "id, product_id, change_type, quantity, movement_time";

/// The stock ledger.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = db.ledger();
///
/// ledger.record_movement(hammer.id, ChangeType::In, 5).await?;
/// let history = ledger.list_for_product(hammer.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
    policy: StockPolicy,
}

impl StockLedger {
    /// Creates a ledger with the default policy.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger {
            pool,
            policy: StockPolicy::default(),
        }
    }

    /// Replaces the policy.
    pub fn with_policy(mut self, policy: StockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Applies a movement to a product and appends its record, atomically.
    ///
    /// ## Returns
    /// * `Ok(StockMovement)` - Both writes committed
    /// * `Err(InvalidQuantity)` - `quantity` outside `1..=MAX_MOVEMENT_QUANTITY`,
    ///   or the balance would overflow; nothing was written
    /// * `Err(TransactionFailed)` - A statement failed mid-transaction; rolled back
    /// * `Err(ProductNotFound)` - Unknown product; rolled back, no row written
    /// * `Err(InsufficientStock)` - OUT exceeds the balance under
    ///   `RejectInsufficient`; rolled back
    pub async fn record_movement(
        &self,
        product_id: i64,
        change_type: ChangeType,
        quantity: i64,
    ) -> DbResult<StockMovement> {
        validate_movement_quantity(quantity)?;

        let guarded = self.policy == StockPolicy::RejectInsufficient && change_type == ChangeType::Out;

        debug!(
            product_id = product_id,
            change_type = %change_type,
            quantity = quantity,
            guarded = guarded,
            "Recording stock movement"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // SQLite turns an overflowing integer sum into REAL, so the bound keeps
        // the new balance inside i64.
        let update = match change_type {
            ChangeType::In => sqlx::query(
                "UPDATE products SET quantity = quantity + ?1 WHERE id = ?2 AND quantity <= ?3",
            )
            .bind(quantity)
            .bind(product_id)
            .bind(i64::MAX - quantity),
            ChangeType::Out => sqlx::query(
                "UPDATE products SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?3",
            )
            .bind(quantity)
            .bind(product_id)
            .bind(if guarded { quantity } else { i64::MIN + quantity }),
        };

        let updated = update
            .execute(&mut *tx)
            .await
            .map_err(in_transaction("stock_movements.update_quantity"))?;

        if updated.rows_affected() == 0 {
            let available: Option<i64> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(in_transaction("stock_movements.read_balance"))?;

            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            return Err(match available {
                None => CoreError::ProductNotFound(product_id.to_string()).into(),
                Some(available) if guarded && available < quantity => {
                    warn!(
                        product_id = product_id,
                        available = available,
                        requested = quantity,
                        "Rejected OUT movement: insufficient stock"
                    );
                    CoreError::insufficient(product_id, available, quantity).into()
                }
                Some(available) => {
                    warn!(
                        product_id = product_id,
                        available = available,
                        change_type = %change_type,
                        quantity = quantity,
                        "Rejected movement: balance would leave the integer range"
                    );
                    CoreError::InvalidQuantity(quantity).into()
                }
            });
        }

        let movement_time = Utc::now();
        let inserted = sqlx::query(
            r#"
            INSERT INTO stock_movements (product_id, change_type, quantity, movement_time)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(product_id)
        .bind(change_type)
        .bind(quantity)
        .bind(movement_time)
        .execute(&mut *tx)
        .await
        .map_err(in_transaction("stock_movements.insert"))?;

        let id = inserted.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            movement_id = id,
            product_id = product_id,
            change_type = %change_type,
            quantity = quantity,
            "Stock movement recorded"
        );

        Ok(StockMovement {
            id,
            product_id,
            change_type,
            quantity,
            movement_time,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every movement, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements ORDER BY movement_time DESC, id DESC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("stock_movements.list_all"))?;

        Ok(movements)
    }

    /// Movements of one product, newest first. Unknown ids give an empty list.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE product_id = ?1 ORDER BY movement_time DESC, id DESC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("stock_movements.list_for_product"))?;

        Ok(movements)
    }

    /// Movements with `start <= movement_time <= end`, newest first.
    ///
    /// A reversed range yields nothing.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<StockMovement>> {
        if start > end {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM stock_movements
            WHERE movement_time >= ?1 AND movement_time <= ?2
            ORDER BY movement_time DESC, id DESC
            "#
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("stock_movements.list_between"))?;

        Ok(movements)
    }

    /// Movements of one direction, newest first.
    pub async fn list_by_type(&self, change_type: ChangeType) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE change_type = ?1 ORDER BY movement_time DESC, id DESC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(change_type)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("stock_movements.list_by_type"))?;

        Ok(movements)
    }

    /// The most recent movement of a product.
    ///
    /// ## Returns
    /// * `Err(NoMovementFound)` - The product has no history
    pub async fn latest_for_product(&self, product_id: i64) -> DbResult<StockMovement> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE product_id = ?1 ORDER BY movement_time DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("stock_movements.latest_for_product"))?
            .ok_or_else(|| CoreError::NoMovementFound(product_id).into())
    }

    /// Sum of IN minus OUT quantities recorded for a product.
    ///
    /// For a product only ever changed through the ledger,
    /// `initial quantity + net_change == current quantity`.
    pub async fn net_change(&self, product_id: i64) -> DbResult<i64> {
        let net: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE change_type WHEN 'IN' THEN quantity ELSE -quantity END), 0)
            FROM stock_movements
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(logged("stock_movements.net_change"))?;

        Ok(net)
    }

    /// Number of movement rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await
            .map_err(logged("stock_movements.count"))?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use stockroom_core::{Money, NewProduct};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tools = db.categories().create("Tools").await.unwrap();
        let hammer = db
            .products()
            .create(NewProduct::new("Hammer", tools.id, 10, Money::from_cents(999)))
            .await
            .unwrap();
        (db, hammer.id)
    }

    #[tokio::test]
    async fn test_out_reduces_quantity_and_appends_row() {
        let (db, hammer) = setup().await;

        let movement = db
            .ledger()
            .record_movement(hammer, ChangeType::Out, 3)
            .await
            .unwrap();

        assert_eq!(movement.change_type, ChangeType::Out);
        assert_eq!(movement.quantity, 3);
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 7);

        let history = db.ledger().list_for_product(hammer).await.unwrap();
        assert_eq!(history, vec![movement]);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected() {
        let (db, hammer) = setup().await;
        let ledger = db.ledger();

        for bad in [0, -1] {
            let err = ledger
                .record_movement(hammer, ChangeType::In, bad)
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::InvalidQuantity(_))));
        }
        assert_eq!(ledger.count().await.unwrap(), 0);
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected() {
        let (db, hammer) = setup().await;

        let err = db
            .ledger()
            .record_movement(hammer, ChangeType::In, i64::MAX)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::InvalidQuantity(_))));
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 10);
        assert_eq!(db.products().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_balance_stays_inside_integer_range() {
        let (db, hammer) = setup().await;
        let ledger = db.ledger();

        sqlx::query("UPDATE products SET quantity = ?1 WHERE id = ?2")
            .bind(i64::MAX - 5)
            .bind(hammer)
            .execute(db.pool())
            .await
            .unwrap();
        let err = ledger
            .record_movement(hammer, ChangeType::In, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidQuantity(10))));
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, i64::MAX - 5);

        sqlx::query("UPDATE products SET quantity = ?1 WHERE id = ?2")
            .bind(i64::MIN + 5)
            .bind(hammer)
            .execute(db.pool())
            .await
            .unwrap();
        let err = ledger
            .record_movement(hammer, ChangeType::Out, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidQuantity(10))));
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, i64::MIN + 5);

        assert_eq!(ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_writes_nothing() {
        let (db, _) = setup().await;
        let ledger = db.ledger();

        let err = ledger
            .record_movement(999, ChangeType::In, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(ref id)) if id == "999"));
        assert_eq!(ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_allow_negative_by_default() {
        let (db, hammer) = setup().await;
        db.ledger()
            .record_movement(hammer, ChangeType::Out, 3)
            .await
            .unwrap();

        db.ledger()
            .record_movement(hammer, ChangeType::Out, 1000)
            .await
            .unwrap();

        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, -993);
    }

    #[tokio::test]
    async fn test_reject_insufficient_writes_nothing() {
        let (db, hammer) = setup().await;
        let ledger = db.ledger_with_policy(StockPolicy::RejectInsufficient);

        let err = ledger
            .record_movement(hammer, ChangeType::Out, 11)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 10,
                requested: 11,
                ..
            })
        ));
        assert_eq!(ledger.count().await.unwrap(), 0);

        // Exactly the balance is fine, and IN is never guarded.
        ledger.record_movement(hammer, ChangeType::Out, 10).await.unwrap();
        ledger.record_movement(hammer, ChangeType::In, 2).await.unwrap();
        assert_eq!(db.products().get_by_id(hammer).await.unwrap().quantity, 2);

        let err = ledger
            .record_movement(404, ChangeType::Out, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(ref id)) if id == "404"));
    }

    #[tokio::test]
    async fn test_queries_order_newest_first() {
        let (db, hammer) = setup().await;
        let ledger = db.ledger();

        let first = ledger.record_movement(hammer, ChangeType::In, 5).await.unwrap();
        let second = ledger.record_movement(hammer, ChangeType::Out, 2).await.unwrap();
        let third = ledger.record_movement(hammer, ChangeType::In, 1).await.unwrap();

        let ids: Vec<i64> = ledger.list_all().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let ins: Vec<i64> = ledger
            .list_by_type(ChangeType::In)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ins, vec![third.id, first.id]);

        assert_eq!(ledger.latest_for_product(hammer).await.unwrap(), third);
        assert_eq!(ledger.net_change(hammer).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_latest_without_history() {
        let (db, hammer) = setup().await;
        let err = db.ledger().latest_for_product(hammer).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NoMovementFound(_))));
    }

    #[tokio::test]
    async fn test_list_between_is_closed_interval() {
        let (db, hammer) = setup().await;
        let ledger = db.ledger();

        let movement = ledger.record_movement(hammer, ChangeType::In, 1).await.unwrap();
        let at = movement.movement_time;

        assert_eq!(ledger.list_between(at, at).await.unwrap(), vec![movement.clone()]);
        assert_eq!(
            ledger
                .list_between(at - Duration::minutes(1), at + Duration::minutes(1))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(ledger
            .list_between(at + Duration::seconds(1), at + Duration::minutes(1))
            .await
            .unwrap()
            .is_empty());
        assert!(ledger
            .list_between(at + Duration::minutes(1), at - Duration::minutes(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_product_deletion() {
        let (db, hammer) = setup().await;
        db.ledger().record_movement(hammer, ChangeType::In, 1).await.unwrap();

        assert!(db.products().delete_by_id(hammer).await.unwrap());
        assert_eq!(db.ledger().list_for_product(hammer).await.unwrap().len(), 1);
    }
}
