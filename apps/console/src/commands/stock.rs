//! # Stock Commands
//!
//! Recording movements and querying the movement history. All of them
//! require `RecordMovements`, which both roles hold.

use chrono::{DateTime, Utc};
use stockroom_core::{Capability, ChangeType, StockMovement};
use stockroom_db::{Database, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::authorize;

/// Records an IN or OUT movement and adjusts the product quantity.
///
/// Uses the stock policy the database was opened with.
pub async fn record_movement(
    db: &Database,
    session: &Session,
    product_id: i64,
    change_type: ChangeType,
    quantity: i64,
) -> Result<StockMovement, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    debug!(product_id, %change_type, quantity, "record_movement command");

    let movement = db
        .ledger()
        .record_movement(product_id, change_type, quantity)
        .await?;
    info!(
        movement_id = movement.id,
        product_id,
        %change_type,
        quantity,
        by = %session.username,
        "Stock movement recorded"
    );
    Ok(movement)
}

pub async fn list_movements(
    db: &Database,
    session: &Session,
) -> Result<Vec<StockMovement>, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    Ok(db.ledger().list_all().await?)
}

pub async fn movements_for_product(
    db: &Database,
    session: &Session,
    product_id: i64,
) -> Result<Vec<StockMovement>, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    Ok(db.ledger().list_for_product(product_id).await?)
}

/// Movements with `start <= movement_time <= end`.
pub async fn movements_between(
    db: &Database,
    session: &Session,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<StockMovement>, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    debug!(%start, %end, "movements_between command");
    Ok(db.ledger().list_between(start, end).await?)
}

pub async fn movements_by_type(
    db: &Database,
    session: &Session,
    change_type: ChangeType,
) -> Result<Vec<StockMovement>, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    Ok(db.ledger().list_by_type(change_type).await?)
}

pub async fn latest_movement(
    db: &Database,
    session: &Session,
    product_id: i64,
) -> Result<StockMovement, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    Ok(db.ledger().latest_for_product(product_id).await?)
}

/// Sum of signed movement quantities for one product.
pub async fn net_change(db: &Database, session: &Session, product_id: i64) -> Result<i64, ApiError> {
    authorize(session, Capability::RecordMovements)?;
    Ok(db.ledger().net_change(product_id).await?)
}
