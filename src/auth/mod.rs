pub mod provider;

pub use provider::StoreAuth;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::error::{AppError, Result};
use crate::models::{Role, UserRecord};

/// Resolved session identity passed to handlers
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

/// Result of redeeming a one-time code
#[derive(Debug, Clone)]
pub struct SignIn {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user_id: String,
    pub user: UserRecord,
}

/// Auth collaborator injected into every boundary handler
///
/// Handlers never reach into ambient state; they resolve the caller through
/// this trait and receive `Session` (or none) as plain data.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the session from request headers
    ///
    /// Absent, unknown or expired credentials resolve to Ok(None), never an
    /// error; anonymous access is a normal outcome.
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>>;

    /// Stage a one-time sign-in code for the address and return it
    async fn issue_otp(&self, email: &str) -> Result<String>;

    /// Redeem a staged code; single use, creates the user on first sign-in
    async fn verify_otp(&self, email: &str, code: &str) -> Result<SignIn>;

    /// Mint an opaque password-reset token for the address
    async fn issue_reset_token(&self, email: &str) -> Result<String>;
}

/// Require a signed-in caller, translating anonymity to 401
pub fn require_user(session: Option<Session>) -> Result<Session> {
    session.ok_or(AppError::Unauthenticated)
}

/// Require an ADMIN caller: 401 when anonymous, 403 when role is too low
pub fn require_admin(session: Option<Session>) -> Result<Session> {
    let session = require_user(session)?;
    if session.role != Role::Admin {
        tracing::warn!("User {} denied admin access", session.user_id);
        return Err(AppError::Forbidden);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user_id: "u1".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_user() {
        assert!(matches!(require_user(None), Err(AppError::Unauthenticated)));
        assert!(require_user(Some(session(Role::User))).is_ok());
    }

    #[test]
    fn test_require_admin_ladder() {
        assert!(matches!(
            require_admin(None),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            require_admin(Some(session(Role::User))),
            Err(AppError::Forbidden)
        ));
        assert!(require_admin(Some(session(Role::Admin))).is_ok());
    }
}
