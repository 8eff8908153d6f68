//! # User Commands
//!
//! Administrator-only account management and the audit log screen.

use stockroom_core::{Capability, User, UserLog};
use stockroom_db::{Database, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::authorize;

/// All accounts, ordered by username.
pub async fn list_users(db: &Database, session: &Session) -> Result<Vec<User>, ApiError> {
    authorize(session, Capability::ManageUsers)?;
    debug!("list_users command");
    Ok(db.users().list_all().await?)
}

/// Deletes `target` on behalf of the session's user.
pub async fn delete_user(db: &Database, session: &Session, target: &str) -> Result<(), ApiError> {
    authorize(session, Capability::ManageUsers)?;
    let target = target.trim();
    debug!(target = %target, "delete_user command");
    Ok(db.access().delete_user(&session.username, target).await?)
}

/// The newest `limit` audit rows.
pub async fn view_logs(
    db: &Database,
    session: &Session,
    limit: u32,
) -> Result<Vec<UserLog>, ApiError> {
    authorize(session, Capability::ViewAuditLog)?;
    debug!(limit, "view_logs command");
    Ok(db.audit().list_recent(limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockroom_core::Role;
    use stockroom_db::DbConfig;

    async fn setup() -> (Database, Session) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.access().register("boss", "pw", Role::Admin).await.unwrap();
        db.access().register("clerk", "pw", Role::Employee).await.unwrap();
        let session = db.access().login("boss", "pw").await.unwrap();
        (db, session)
    }

    #[tokio::test]
    async fn test_admin_deletes_employee() {
        let (db, boss) = setup().await;

        delete_user(&db, &boss, "clerk").await.unwrap();

        let users = list_users(&db, &boss).await.unwrap();
        assert_eq!(users.len(), 1);

        let logs = view_logs(&db, &boss, 1).await.unwrap();
        assert_eq!(logs[0].action, "DELETE");
        assert_eq!(logs[0].username, "clerk");
    }

    #[tokio::test]
    async fn test_self_deletion_refused() {
        let (db, boss) = setup().await;
        let err = delete_user(&db, &boss, "boss").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_employee_is_forbidden() {
        let (db, _) = setup().await;
        let clerk = db.access().login("clerk", "pw").await.unwrap();

        for err in [
            list_users(&db, &clerk).await.unwrap_err(),
            delete_user(&db, &clerk, "boss").await.unwrap_err(),
            view_logs(&db, &clerk, 10).await.unwrap_err(),
        ] {
            assert_eq!(err.code, ErrorCode::Forbidden);
        }
    }
}
