//! Account use-cases: signup, login and bearer-token authentication.
//!
//! Passwords are digested with [`PasswordHash`] on the blocking pool; only the
//! fingerprint of an issued token is stored, so a leaked session table cannot
//! be replayed. Expired sessions are deleted when presented and purged on
//! every login.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    LoginService, SessionAuthenticator, SessionRepository, SessionRepositoryError, SignupService,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, PasswordHash, PasswordHashError, SessionRecord,
    SessionToken, SignupForm, User, UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing the signup, login and authenticator ports.
#[derive(Clone)]
pub struct AccountService<U, S> {
    users: Arc<U>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
    session_ttl: TimeDelta,
}

impl<U, S> AccountService<U, S> {
    /// Create a service issuing sessions that live for `session_ttl`.
    ///
    /// ```ignore
    /// let service = AccountService::new(users, sessions, Arc::new(DefaultClock), TimeDelta::hours(24));
    /// ```
    pub fn new(users: Arc<U>, sessions: Arc<S>, clock: Arc<dyn Clock>, session_ttl: TimeDelta) -> Self {
        Self {
            users,
            sessions,
            clock,
            session_ttl,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { .. } => username_taken(),
    }
}

fn map_session_error(error: SessionRepositoryError) -> Error {
    match error {
        SessionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("session repository unavailable: {message}"))
        }
        SessionRepositoryError::Query { message } => {
            Error::internal(format!("session repository error: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password digest failed: {error}"))
}

fn username_taken() -> Error {
    Error::invalid_request("username taken")
        .with_details(json!({ "field": "username", "code": "username_taken" }))
}

#[async_trait]
impl<U, S> SignupService for AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn sign_up(&self, form: &SignupForm) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(form.username().as_ref())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(username_taken());
        }

        let user = User::new(UserId::random(), form.username().clone());
        let hash = PasswordHash::derive_blocking(form.password())
            .await
            .map_err(map_hash_error)?;
        let account = UserAccount::new(user.clone(), hash);
        self.users.insert(&account).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "account created");
        Ok(user)
    }
}

#[async_trait]
impl<U, S> LoginService for AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let account = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let verified = account
            .password_hash()
            .verify_blocking(credentials.password())
            .await
            .map_err(map_hash_error)?;
        if !verified {
            debug!(username = credentials.username(), "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let now = self.clock.utc();
        match self.sessions.purge_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "expired sessions purged"),
            Err(error) => warn!(%error, "failed to purge expired sessions"),
        }

        let token = SessionToken::generate();
        let record = SessionRecord {
            fingerprint: token.fingerprint(),
            user_id: account.user().id().clone(),
            expires_at: now + self.session_ttl,
        };
        self.sessions
            .insert(&record)
            .await
            .map_err(map_session_error)?;
        Ok(AuthenticatedSession::new(token, account.user()))
    }
}

#[async_trait]
impl<U, S> SessionAuthenticator for AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn authenticate(&self, token: &SessionToken) -> Result<UserId, Error> {
        let fingerprint = token.fingerprint();
        let record = self
            .sessions
            .find(&fingerprint)
            .await
            .map_err(map_session_error)?
            .ok_or_else(|| Error::unauthorized("token invalid"))?;
        if !record.is_active_at(self.clock.utc()) {
            if let Err(error) = self.sessions.delete(&fingerprint).await {
                warn!(%error, "failed to delete expired session");
            }
            return Err(Error::unauthorized("token expired"));
        }
        Ok(record.user_id)
    }
}
