//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{PasswordHash, User, UserAccount, UserId, Username};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, classify_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure, username: Option<&str>) -> UserRepositoryError {
    match failure {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::UniqueViolation(_) => {
            UserRepositoryError::duplicate_username(username.unwrap_or_default())
        }
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_failure(classify_diesel_error(error), None)
}

fn map_pool_error(error: super::pool::PoolError) -> UserRepositoryError {
    map_failure(classify_pool_error(error), None)
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let username = Username::new(&row.username)
        .map_err(|err| UserRepositoryError::query(format!("stored username invalid: {err}")))?;
    let hash = PasswordHash::parse(&row.password_hash)
        .map_err(|err| UserRepositoryError::query(format!("stored password hash invalid: {err}")))?;
    Ok(UserAccount::new(
        User::new(UserId::from_uuid(row.id), username),
        hash,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let username = account.user().username().as_ref();
        let encoded = account.password_hash().encode();
        let row = NewUserRow {
            id: *account.user().id().as_uuid(),
            username,
            password_hash: &encoded,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(classify_diesel_error(err), Some(username)))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row
            .map(row_to_account)
            .transpose()?
            .map(|account| account.user().clone()))
    }
}
