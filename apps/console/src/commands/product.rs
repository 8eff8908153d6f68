//! # Product Commands
//!
//! Catalog reads for every role, writes for roles holding `EditCatalog`.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Lookup Flow                                  │
//! │                                                                         │
//! │  Operator types "12" or "hammer"                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Target::parse                                                          │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  All digits?                              │                         │
//! │  │  YES: get_by_id(12)                       │──► ProductNotFound(12)  │
//! │  │  NO:  find_by_name("hammer") NOCASE       │──► not found: hammer    │
//! │  └───────────────────────────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::{Capability, CoreError, NewProduct, Product, ProductUpdate};
use stockroom_db::{Database, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::input::Target;
use crate::state::authorize;

/// Lists every product by id.
pub async fn list_products(db: &Database, session: &Session) -> Result<Vec<Product>, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    debug!("list_products command");
    Ok(db.products().list_all().await?)
}

/// Case-insensitive substring search on product names.
pub async fn search_products(
    db: &Database,
    session: &Session,
    term: &str,
) -> Result<Vec<Product>, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    let term = term.trim();
    debug!(term = %term, "search_products command");

    let products = db.products().search(term).await?;
    debug!(count = products.len(), "search_products complete");
    Ok(products)
}

/// Gets one product by id or exact name.
pub async fn get_product(
    db: &Database,
    session: &Session,
    target: &Target,
) -> Result<Product, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    debug!(?target, "get_product command");

    match target {
        Target::Id(id) => Ok(db.products().get_by_id(*id).await?),
        Target::Name(name) => db
            .products()
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(name.clone()).into()),
    }
}

/// Products in one category.
pub async fn products_in_category(
    db: &Database,
    session: &Session,
    category_id: i64,
) -> Result<Vec<Product>, ApiError> {
    authorize(session, Capability::ViewCatalog)?;
    debug!(category_id, "products_in_category command");
    Ok(db.products().list_by_category(category_id).await?)
}

/// Adds a product.
pub async fn add_product(
    db: &Database,
    session: &Session,
    product: NewProduct,
) -> Result<Product, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    let product = db.products().create(product).await?;
    info!(id = product.id, name = %product.name, by = %session.username, "Product added");
    Ok(product)
}

/// Applies a partial update. Fields left `None` keep their value.
pub async fn update_product(
    db: &Database,
    session: &Session,
    target: &Target,
    changes: ProductUpdate,
) -> Result<Product, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    debug!(?target, "update_product command");

    let product = match target {
        Target::Id(id) => db.products().update(*id, changes).await?,
        Target::Name(name) => db.products().update_by_name(name, changes).await?,
    };
    info!(id = product.id, by = %session.username, "Product updated");
    Ok(product)
}

/// Deletes by id, or every product with the given name.
///
/// Returns `false` when nothing matched.
pub async fn delete_product(
    db: &Database,
    session: &Session,
    target: &Target,
) -> Result<bool, ApiError> {
    authorize(session, Capability::EditCatalog)?;
    debug!(?target, "delete_product command");

    let deleted = match target {
        Target::Id(id) => db.products().delete_by_id(*id).await?,
        Target::Name(name) => db.products().delete_by_name(name).await?,
    };
    if deleted {
        info!(?target, by = %session.username, "Product deleted");
    }
    Ok(deleted)
}
