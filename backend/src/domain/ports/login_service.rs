//! Driving ports for account use-cases: signup, login, token authentication.
//!
//! Inbound adapters call these without knowing the backing storage, so
//! handler tests substitute doubles instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, Error, LoginCredentials, SessionToken, SignupForm, User, UserId};

/// Account registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, form: &SignupForm) -> Result<User, Error>;
}

/// Credential authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a bearer session.
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error>;
}

/// Bearer token verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Resolve the user owning `token`. Unknown or expired tokens yield
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn authenticate(&self, token: &SessionToken) -> Result<UserId, Error>;
}
