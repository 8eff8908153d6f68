//! # User Repository
//!
//! Rows of the `users` table. Password digests are read only through
//! [`UserRepository::password_hash`]; every listing returns [`User`], which
//! has no hash field.

use sqlx::SqlitePool;
use stockroom_core::{CoreError, Role, User};
use tracing::{debug, info};

use super::logged;
use crate::error::{DbError, DbResult};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user with an already computed digest.
    ///
    /// ## Returns
    /// * `Err(UsernameTaken)` - The UNIQUE constraint rejected the name
    pub async fn insert(&self, username: &str, password_hash: &str, role: Role) -> DbResult<User> {
        debug!(username = %username, role = %role, "Inserting user");

        let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(logged("users.insert"))
            .map_err(|err| match err {
                DbError::UniqueViolation { .. } => {
                    DbError::Domain(CoreError::UsernameTaken(username.to_string()))
                }
                other => other,
            })?;

        info!(username = %username, role = %role, "User inserted");
        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            role,
        })
    }

    /// Finds a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, role FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(logged("users.find_by_username"))?;

        Ok(user)
    }

    /// Stored digest for a username, if the user exists.
    pub async fn password_hash(&self, username: &str) -> DbResult<Option<String>> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(logged("users.password_hash"))?;

        Ok(hash)
    }

    /// Role of a username, if the user exists.
    pub async fn role_of(&self, username: &str) -> DbResult<Option<Role>> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("users.role_of"))?;

        Ok(role)
    }

    /// Whether the username is registered.
    pub async fn exists(&self, username: &str) -> DbResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// All users ordered by username.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT id, username, role FROM users ORDER BY username")
                .fetch_all(&self.pool)
                .await
                .map_err(logged("users.list_all"))?;

        Ok(users)
    }

    /// Number of ADMIN users.
    pub async fn count_admins(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(Role::Admin)
            .fetch_one(&self.pool)
            .await
            .map_err(logged("users.count_admins"))?;

        Ok(count)
    }

    /// Deletes a user row. Callers enforce the admin rules first.
    pub async fn delete(&self, username: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(logged("users.delete"))?;

        Ok(result.rows_affected() > 0)
    }
}
