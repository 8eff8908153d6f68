//! # Category Repository
//!
//! Database operations for product categories.
//!
//! A category cannot be deleted while products still point at it. The
//! repository refuses with `CategoryInUse` and the schema's foreign key
//! backs that up.

use sqlx::SqlitePool;
use stockroom_core::validation::validate_category_name;
use stockroom_core::{Category, CoreError};
use tracing::{debug, info};

use super::{like_pattern, logged};
use crate::error::{DbError, DbResult};

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CategoryRepository::new(pool);
///
/// let tools = repo.create("Tools").await?;
/// let found = repo.find_by_name("tools").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category and returns it with its generated id.
    pub async fn create(&self, name: &str) -> DbResult<Category> {
        let name = validate_category_name(name)?;
        debug!(name = %name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(logged("categories.create"))?;

        let category = Category {
            id: result.last_insert_rowid(),
            name,
        };
        info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Lists every category ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(logged("categories.list_all"))?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Category found
    /// * `Err(CategoryNotFound)` - No such id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("categories.get_by_id"))?
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()).into())
    }

    /// Finds a category by exact name, ignoring ASCII case.
    ///
    /// With duplicate names the lowest id wins.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name FROM categories
            WHERE name = ?1 COLLATE NOCASE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(logged("categories.find_by_name"))?;

        Ok(category)
    }

    /// Case-insensitive substring search. A blank term returns everything.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Category>> {
        let term = term.trim();
        debug!(term = %term, "Searching categories");

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name FROM categories
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(logged("categories.search"))?;

        Ok(categories)
    }

    /// Renames a category.
    pub async fn rename(&self, id: i64, new_name: &str) -> DbResult<Category> {
        let new_name = validate_category_name(new_name)?;
        debug!(id = id, new_name = %new_name, "Renaming category");

        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(&new_name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(logged("categories.rename"))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CategoryNotFound(id.to_string()).into());
        }

        Ok(Category { id, name: new_name })
    }

    /// Renames the category currently called `old_name`.
    pub async fn rename_by_name(&self, old_name: &str, new_name: &str) -> DbResult<Category> {
        let category = self
            .find_by_name(old_name)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(old_name.trim().to_string()))?;

        self.rename(category.id, new_name).await
    }

    /// Whether a category with this id exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("categories.exists"))?;

        Ok(found.is_some())
    }

    /// Number of products in the category.
    pub async fn count_products(&self, id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(logged("categories.count_products"))?;

        Ok(count)
    }

    /// Deletes a category that no product references.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row removed
    /// * `Ok(false)` - No such id
    /// * `Err(CategoryInUse)` - Products still reference it
    pub async fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        let category = match self.get_by_id(id).await {
            Ok(category) => category,
            Err(DbError::Domain(CoreError::CategoryNotFound(_))) => return Ok(false),
            Err(e) => return Err(e),
        };

        self.ensure_unused(&category).await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(logged("categories.delete_by_id"))?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(id = id, name = %category.name, "Category deleted");
        }
        Ok(removed)
    }

    /// Deletes every category whose name matches, ignoring ASCII case.
    ///
    /// Nothing is deleted if any of them is still in use.
    pub async fn delete_by_name(&self, name: &str) -> DbResult<bool> {
        let matching = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories WHERE name = ?1 COLLATE NOCASE ORDER BY id",
        )
        .bind(name.trim())
        .fetch_all(&self.pool)
        .await
        .map_err(logged("categories.delete_by_name"))?;

        for category in &matching {
            self.ensure_unused(category).await?;
        }

        let result = sqlx::query("DELETE FROM categories WHERE name = ?1 COLLATE NOCASE")
            .bind(name.trim())
            .execute(&self.pool)
            .await
            .map_err(logged("categories.delete_by_name"))?;

        debug!(name = %name.trim(), removed = result.rows_affected(), "Categories deleted by name");
        Ok(result.rows_affected() > 0)
    }

    async fn ensure_unused(&self, category: &Category) -> DbResult<()> {
        let products = self.count_products(category.id).await?;
        if products > 0 {
            return Err(CoreError::CategoryInUse {
                category: category.name.clone(),
                products,
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
