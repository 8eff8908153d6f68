//! # Access Control
//!
//! Login, registration and user removal on top of [`UserRepository`], with
//! each successful action appended to the [`AuditLog`].
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login("alice", "pw")                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  digest = sha256("pw")            (computed even for unknown users)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stored = SELECT password ...  ── none / mismatch ──► InvalidCredentials│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  role = SELECT role ...                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  audit "LOGIN SUCCESS"  (best-effort)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Session { username, role }                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Role gating is not done here. The console checks
//! [`Session::can`] before each command.

use serde::Serialize;
use stockroom_core::validation::{validate_password, validate_username};
use stockroom_core::{hash_password, verify_password, Capability, CoreError, Role, User};
use tracing::{info, warn};

use crate::error::DbResult;
use crate::repository::audit::{AuditAction, AuditLog};
use crate::repository::user::UserRepository;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Whether the session's role grants `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authentication and user management.
#[derive(Debug, Clone)]
pub struct AccessControl {
    users: UserRepository,
    audit: AuditLog,
}

impl AccessControl {
    pub fn new(users: UserRepository, audit: AuditLog) -> Self {
        AccessControl { users, audit }
    }

    /// Checks a username/password pair.
    ///
    /// Returns `false` both for an unknown user and for a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<bool> {
        let stored = self.users.password_hash(username).await?;

        Ok(match stored {
            Some(stored) => verify_password(password, &stored),
            None => {
                // Unknown users still pay for one digest.
                let _ = hash_password(password);
                false
            }
        })
    }

    /// Authenticates and opens a session.
    ///
    /// ## Returns
    /// * `Err(InvalidCredentials)` - Unknown user or wrong password
    pub async fn login(&self, username: &str, password: &str) -> DbResult<Session> {
        if !self.authenticate(username, password).await? {
            warn!(username = %username, "Login failed");
            return Err(CoreError::InvalidCredentials.into());
        }

        let role = self
            .users
            .role_of(username)
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        self.audit.log(username, AuditAction::LoginSuccess).await;
        info!(username = %username, role = %role, "User logged in");

        Ok(Session {
            username: username.to_string(),
            role,
        })
    }

    /// Closes a session.
    pub async fn logout(&self, session: &Session) {
        self.audit.log(&session.username, AuditAction::Logout).await;
        info!(username = %session.username, "User logged out");
    }

    /// Registers a new user.
    ///
    /// ## Returns
    /// * `Err(EmptyField)` - Blank username or password
    /// * `Err(UsernameTaken)` - Name already registered
    pub async fn register(&self, username: &str, password: &str, role: Role) -> DbResult<User> {
        let username = validate_username(username)?;
        validate_password(password)?;

        if self.users.exists(&username).await? {
            return Err(CoreError::UsernameTaken(username).into());
        }

        let user = self
            .users
            .insert(&username, &hash_password(password), role)
            .await?;

        self.audit.log(&user.username, AuditAction::Register).await;
        info!(username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    /// Deletes `target` on behalf of `acting_username`.
    ///
    /// ## Returns
    /// * `Err(SelfDeletion)` - Target is the acting user
    /// * `Err(UserNotFound)` - No such target
    /// * `Err(LastAdmin)` - Target is the only ADMIN
    pub async fn delete_user(&self, acting_username: &str, target: &str) -> DbResult<()> {
        if acting_username == target {
            return Err(CoreError::SelfDeletion.into());
        }

        let user = self
            .users
            .find_by_username(target)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(target.to_string()))?;

        if user.role == Role::Admin && self.users.count_admins().await? <= 1 {
            return Err(CoreError::LastAdmin.into());
        }

        if !self.users.delete(target).await? {
            return Err(CoreError::UserNotFound(target.to_string()).into());
        }

        self.audit.log(target, AuditAction::Delete).await;
        info!(acting = %acting_username, target = %target, "User deleted");
        Ok(())
    }

    /// Inserts an ADMIN with these credentials unless an ADMIN already exists.
    ///
    /// ## Returns
    /// * `Ok(true)` - Admin inserted
    /// * `Ok(false)` - An admin was already present; nothing changed
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> DbResult<bool> {
        if self.users.count_admins().await? > 0 {
            return Ok(false);
        }

        let username = validate_username(username)?;
        validate_password(password)?;
        self.users
            .insert(&username, &hash_password(password), Role::Admin)
            .await?;

        info!(username = %username, "Bootstrap admin created");
        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
