//! Driven port for issued bearer sessions.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SessionRecord, TokenFingerprint};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by session repository adapters.
    pub enum SessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
    }
}

/// Storage for session records keyed by token fingerprint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Record a newly issued session.
    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError>;

    /// Look up a session by the fingerprint of its token.
    async fn find(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError>;

    /// Remove one session. Removing an unknown fingerprint is not an error.
    async fn delete(&self, fingerprint: &TokenFingerprint) -> Result<(), SessionRepositoryError>;

    /// Remove every session that expired at or before `now`; returns how many
    /// went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError>;
}
