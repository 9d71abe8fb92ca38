use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{SessionRepository, SessionRepositoryError};
use crate::domain::{SessionRecord, TokenFingerprint};

/// Session store keyed by token fingerprint.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<TokenFingerprint, SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError> {
        self.sessions
            .write()
            .await
            .insert(record.fingerprint.clone(), record.clone());
        Ok(())
    }

    async fn find(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Ok(self.sessions.read().await.get(fingerprint).cloned())
    }

    async fn delete(&self, fingerprint: &TokenFingerprint) -> Result<(), SessionRepositoryError> {
        self.sessions.write().await.remove(fingerprint);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.is_active_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
