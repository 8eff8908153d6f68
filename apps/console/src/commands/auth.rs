//! # Auth Commands
//!
//! Login, logout and self-registration from the main menu.

use stockroom_core::{Role, User};
use stockroom_db::{Database, Session};
use tracing::debug;

use crate::error::ApiError;

/// Checks credentials and opens a session.
///
/// ## Returns
/// * `Ok(Session)` - Credentials matched; a `LOGIN SUCCESS` row was written
/// * `Err(InvalidCredentials)` - Unknown user or wrong password (indistinguishable)
pub async fn login(db: &Database, username: &str, password: &str) -> Result<Session, ApiError> {
    debug!(username = %username.trim(), "login command");
    Ok(db.access().login(username.trim(), password).await?)
}

/// Closes a session and writes a `LOGOUT` row.
pub async fn logout(db: &Database, session: &Session) {
    debug!(username = %session.username, "logout command");
    db.access().logout(session).await;
}

/// Registers a new account.
pub async fn register(
    db: &Database,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User, ApiError> {
    debug!(username = %username.trim(), role = %role, "register command");
    Ok(db.access().register(username, password, role).await?)
}
