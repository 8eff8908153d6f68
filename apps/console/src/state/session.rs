//! The logged-in operator, if any.

use stockroom_core::Capability;
use stockroom_db::Session;

use crate::error::{ApiError, ErrorCode};

/// Holds the current session between menu screens.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn begin(&mut self, session: Session) {
        self.current = Some(session);
    }

    /// Ends the session, returning it so the caller can audit the logout.
    pub fn end(&mut self) -> Option<Session> {
        self.current.take()
    }

    /// The current session, if it may use `capability`.
    pub fn require(&self, capability: Capability) -> Result<&Session, ApiError> {
        let session = self
            .current
            .as_ref()
            .ok_or_else(|| ApiError::new(ErrorCode::Forbidden, "Please log in first"))?;
        authorize(session, capability)?;
        Ok(session)
    }
}

/// Fails with [`ErrorCode::Forbidden`] unless the session's role grants `capability`.
pub fn authorize(session: &Session, capability: Capability) -> Result<(), ApiError> {
    if session.can(capability) {
        Ok(())
    } else {
        tracing::warn!(
            username = %session.username,
            role = %session.role,
            ?capability,
            "Capability denied"
        );
        Err(ApiError::forbidden(capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Role;

    fn session(role: Role) -> Session {
        Session {
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_without_login() {
        let state = SessionState::new();
        let err = state.require(Capability::ViewCatalog).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_employee_capabilities() {
        let mut state = SessionState::new();
        state.begin(session(Role::Employee));

        assert!(state.require(Capability::ViewCatalog).is_ok());
        assert!(state.require(Capability::RecordMovements).is_ok());
        assert!(state.require(Capability::EditCatalog).is_err());
        assert!(state.require(Capability::ManageUsers).is_err());
    }

    #[test]
    fn test_end_clears_session() {
        let mut state = SessionState::new();
        state.begin(session(Role::Admin));
        assert!(state.require(Capability::ManageUsers).is_ok());

        let ended = state.end().unwrap();
        assert_eq!(ended.role, Role::Admin);
        assert!(state.current().is_none());
    }
}
