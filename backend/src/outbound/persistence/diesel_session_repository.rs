//! PostgreSQL-backed `SessionRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SessionRepository, SessionRepositoryError};
use crate::domain::{SessionRecord, TokenFingerprint, UserId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, classify_pool_error,
};
use super::models::{NewSessionRow, SessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::sessions;

/// Diesel implementation of [`SessionRepository`].
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> SessionRepositoryError {
    match failure {
        DieselFailure::Connection(message) => SessionRepositoryError::connection(message),
        DieselFailure::UniqueViolation(_) => {
            SessionRepositoryError::query("session fingerprint collision")
        }
        DieselFailure::Query(message) => SessionRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> SessionRepositoryError {
    map_failure(classify_diesel_error(error))
}

fn map_pool_error(error: PoolError) -> SessionRepositoryError {
    map_failure(classify_pool_error(error))
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSessionRow {
            token_fingerprint: record.fingerprint.as_ref(),
            user_id: *record.user_id.as_uuid(),
            expires_at: record.expires_at,
        };
        diesel::insert_into(sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SessionRow> = sessions::table
            .filter(sessions::token_fingerprint.eq(fingerprint.as_ref()))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| SessionRecord {
            fingerprint: TokenFingerprint::from_stored(row.token_fingerprint),
            user_id: UserId::from_uuid(row.user_id),
            expires_at: row.expires_at,
        }))
    }

    async fn delete(&self, fingerprint: &TokenFingerprint) -> Result<(), SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(sessions::table.filter(sessions::token_fingerprint.eq(fingerprint.as_ref())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let purged = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(purged as u64)
    }
}
