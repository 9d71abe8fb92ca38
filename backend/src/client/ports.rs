//! Ports the hook layer drives: the REST API and session persistence.
//!
//! Provider lookups reuse the domain [`TaxonomySource`] and [`SummarySource`]
//! ports directly.
//!
//! [`TaxonomySource`]: crate::domain::ports::TaxonomySource
//! [`SummarySource`]: crate::domain::ports::SummarySource

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedSession, LoginCredentials, SetDraft, SetId, SessionToken, SignupForm,
    SpeciesSet, User,
};

use super::ClientError;

/// Account endpoints of the REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// `POST /api/users`.
    async fn sign_up(&self, form: &SignupForm) -> Result<User, ClientError>;

    /// `POST /api/login`.
    async fn log_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, ClientError>;
}

/// Set endpoints of the REST API. Every call carries the bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SetsApi: Send + Sync {
    /// `GET /api/sets`.
    async fn list(&self, token: &SessionToken) -> Result<Vec<SpeciesSet>, ClientError>;

    /// `GET /api/sets/{id}`.
    async fn get(&self, token: &SessionToken, id: &SetId) -> Result<SpeciesSet, ClientError>;

    /// `POST /api/sets`.
    async fn create(
        &self,
        token: &SessionToken,
        draft: &SetDraft,
    ) -> Result<SpeciesSet, ClientError>;

    /// `PUT /api/sets/{id}`.
    async fn update(
        &self,
        token: &SessionToken,
        id: &SetId,
        draft: &SetDraft,
    ) -> Result<SpeciesSet, ClientError>;

    /// `DELETE /api/sets/{id}`.
    async fn delete(&self, token: &SessionToken, id: &SetId) -> Result<(), ClientError>;
}

/// Durable storage for the signed-in session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<AuthenticatedSession>, ClientError>;
    fn save(&self, session: &AuthenticatedSession) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}
