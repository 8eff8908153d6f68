//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Create with category check
//! - Lookup by id, exact name, or substring
//! - Partial update (only supplied columns change)
//! - Delete by id or name
//!
//! ## Quantity Writers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.quantity has two writers:                                     │
//! │                                                                         │
//! │  StockLedger::record_movement   quantity = quantity ± n  + movement row │
//! │  ProductRepository::update      quantity = <absolute>    (no movement) │
//! │                                                                         │
//! │  Only the ledger keeps quantity == initial + Σ movements. The update   │
//! │  path exists for stock-count corrections.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use stockroom_core::validation::{
    validate_id, validate_price_cents, validate_product_name, validate_stock_level,
};
use stockroom_core::{CoreError, NewProduct, Product, ProductUpdate};
use tracing::{debug, info};

use super::{like_pattern, logged};
use crate::error::DbResult;

const PRODUCT_COLUMNS: &str = "id, name, category_id, quantity, price";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let hammer = repo.create(NewProduct::new("Hammer", tools.id, 10, price)).await?;
/// let results = repo.search("ham").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts a product.
    ///
    /// ## Checks (before any write)
    /// - name not blank
    /// - quantity ≥ 0, price ≥ 0
    /// - `category_id` exists, else `InvalidCategory`
    pub async fn create(&self, new_product: NewProduct) -> DbResult<Product> {
        let name = validate_product_name(&new_product.name)?;
        validate_stock_level(new_product.quantity)?;
        validate_price_cents(new_product.price_cents)?;
        self.ensure_category(new_product.category_id).await?;

        debug!(name = %name, category_id = new_product.category_id, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO products (name, category_id, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&name)
        .bind(new_product.category_id)
        .bind(new_product.quantity)
        .bind(new_product.price_cents)
        .execute(&self.pool)
        .await
        .map_err(logged("products.create"))?;

        let product = Product {
            id: result.last_insert_rowid(),
            name,
            category_id: new_product.category_id,
            quantity: new_product.quantity,
            price_cents: new_product.price_cents,
        };
        info!(id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Lists every product ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("products.list_all"))?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(ProductNotFound)` - No such id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("products.get_by_id"))?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    /// Finds a product by exact name, ignoring ASCII case.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("products.find_by_name"))?;

        Ok(product)
    }

    /// Case-insensitive substring search on the name.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Product>> {
        let term = term.trim();
        debug!(term = %term, "Searching products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await
            .map_err(logged("products.search"))?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Products in one category, ordered by id.
    pub async fn list_by_category(&self, category_id: i64) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("products.list_by_category"))?;

        Ok(products)
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// ## Returns
    /// * `Err(NothingToUpdate)` - No field supplied; nothing is written
    /// * `Err(InvalidCategory)` - Supplied category does not exist
    /// * `Err(ProductNotFound)` - No such id
    pub async fn update(&self, id: i64, changes: ProductUpdate) -> DbResult<Product> {
        if changes.is_empty() {
            return Err(CoreError::NothingToUpdate.into());
        }

        let name = changes
            .effective_name()
            .map(validate_product_name)
            .transpose()?;
        if let Some(quantity) = changes.quantity {
            validate_stock_level(quantity)?;
        }
        if let Some(price_cents) = changes.price_cents {
            validate_price_cents(price_cents)?;
        }
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id).await?;
        }

        debug!(id = id, changes = ?changes, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name        = COALESCE(?1, name),
                category_id = COALESCE(?2, category_id),
                quantity    = COALESCE(?3, quantity),
                price       = COALESCE(?4, price)
            WHERE id = ?5
            "#,
        )
        .bind(name)
        .bind(changes.category_id)
        .bind(changes.quantity)
        .bind(changes.price_cents)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(logged("products.update"))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        self.get_by_id(id).await
    }

    /// Applies a partial update to the product found by [`find_by_name`](Self::find_by_name).
    pub async fn update_by_name(&self, name: &str, changes: ProductUpdate) -> DbResult<Product> {
        if changes.is_empty() {
            return Err(CoreError::NothingToUpdate.into());
        }

        let product = self
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(name.trim().to_string()))?;

        self.update(product.id, changes).await
    }

    /// Deletes a product. Its movement history stays.
    pub async fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(logged("products.delete_by_id"))?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(id = id, "Product deleted");
        }
        Ok(removed)
    }

    /// Deletes every product whose name matches, ignoring ASCII case.
    pub async fn delete_by_name(&self, name: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE name = ?1 COLLATE NOCASE")
            .bind(name.trim())
            .execute(&self.pool)
            .await
            .map_err(logged("products.delete_by_name"))?;

        debug!(name = %name.trim(), removed = result.rows_affected(), "Products deleted by name");
        Ok(result.rows_affected() > 0)
    }

    /// Gets the total count of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(logged("products.count"))?;

        Ok(count)
    }

    async fn ensure_category(&self, category_id: i64) -> DbResult<()> {
        validate_id("category id", category_id).map_err(|_| CoreError::InvalidCategory(category_id))?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("products.ensure_category"))?;

        match found {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidCategory(category_id).into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::Money;

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tools = db.categories().create("Tools").await.unwrap();
        (db, tools.id)
    }

    fn hammer(category_id: i64) -> NewProduct {
        NewProduct::new("Hammer", category_id, 10, Money::from_cents(999))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, tools) = setup().await;
        let repo = db.products();

        let created = repo.create(hammer(tools)).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.price().to_string(), "9.99");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let (db, _) = setup().await;
        let err = db.products().create(hammer(77)).await.unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::InvalidCategory(77))));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (db, tools) = setup().await;
        let repo = db.products();

        let mut negative = hammer(tools);
        negative.quantity = -1;
        assert!(repo.create(negative).await.is_err());

        let mut free = hammer(tools);
        free.price_cents = -5;
        assert!(repo.create(free).await.is_err());

        let mut blank = hammer(tools);
        blank.name = " ".to_string();
        assert!(repo.create(blank).await.is_err());

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let (db, _) = setup().await;
        assert!(matches!(
            db.products().get_by_id(5).await,
            Err(DbError::Domain(CoreError::ProductNotFound(ref id))) if id == "5"
        ));
    }

    #[tokio::test]
    async fn test_search_and_find() {
        let (db, tools) = setup().await;
        let repo = db.products();
        repo.create(hammer(tools)).await.unwrap();
        repo.create(NewProduct::new("Sledgehammer", tools, 2, Money::from_cents(4500)))
            .await
            .unwrap();
        repo.create(NewProduct::new("Saw", tools, 4, Money::from_cents(1250)))
            .await
            .unwrap();

        assert_eq!(repo.search("HAMMER").await.unwrap().len(), 2);
        assert_eq!(
            repo.find_by_name("saw").await.unwrap().map(|p| p.quantity),
            Some(4)
        );
        assert!(repo.find_by_name("sa").await.unwrap().is_none());
        assert_eq!(repo.list_by_category(tools).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_supplied_fields() {
        let (db, tools) = setup().await;
        let repo = db.products();
        let created = repo.create(hammer(tools)).await.unwrap();

        let updated = repo
            .update(created.id, ProductUpdate::default().price(Money::from_cents(1099)))
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 1099);
        assert_eq!(updated.name, "Hammer");
        assert_eq!(updated.quantity, 10);
        assert_eq!(updated.category_id, tools);
    }

    #[tokio::test]
    async fn test_blank_name_is_ignored() {
        let (db, tools) = setup().await;
        let repo = db.products();
        let created = repo.create(hammer(tools)).await.unwrap();

        let updated = repo
            .update(created.id, ProductUpdate::default().name("").quantity(3))
            .await
            .unwrap();
        assert_eq!(updated.name, "Hammer");
        assert_eq!(updated.quantity, 3);
    }

    #[tokio::test]
    async fn test_empty_update_writes_nothing() {
        let (db, tools) = setup().await;
        let repo = db.products();
        let created = repo.create(hammer(tools)).await.unwrap();

        let err = repo
            .update(created.id, ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NothingToUpdate)));

        // Even for an id that does not exist: the emptiness check comes first.
        let err = repo.update(999, ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NothingToUpdate)));

        assert_eq!(repo.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_by_name_and_invalid_category() {
        let (db, tools) = setup().await;
        let repo = db.products();
        repo.create(hammer(tools)).await.unwrap();

        let moved = repo
            .update_by_name("hammer", ProductUpdate::default().category_id(tools).name("Mallet"))
            .await
            .unwrap();
        assert_eq!(moved.name, "Mallet");

        let err = repo
            .update_by_name("Mallet", ProductUpdate::default().category_id(40))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidCategory(40))));

        let err = repo
            .update_by_name("Anvil", ProductUpdate::default().quantity(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ProductNotFound(ref name)) if name == "Anvil"
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, tools) = setup().await;
        let repo = db.products();
        let created = repo.create(hammer(tools)).await.unwrap();
        repo.create(NewProduct::new("Saw", tools, 4, Money::from_cents(1250)))
            .await
            .unwrap();

        assert!(repo.delete_by_id(created.id).await.unwrap());
        assert!(!repo.delete_by_id(created.id).await.unwrap());
        assert!(repo.delete_by_name("SAW").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
