//! Driven port for account persistence.
use async_trait::async_trait;

use crate::domain::{User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username `{username}` is already taken",
    }
}

/// Storage for registered accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with
    /// [`UserRepositoryError::DuplicateUsername`] when the name is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account (including its password digest) by username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Fetch a public user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}
