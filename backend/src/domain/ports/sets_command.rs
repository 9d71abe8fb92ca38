//! Driving port for set mutations.
use async_trait::async_trait;

use crate::domain::{Error, SetDraft, SetId, SpeciesSet, UserId};

/// Create, update and delete sets on behalf of an authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SetsCommand: Send + Sync {
    /// Create a set owned by `owner`.
    async fn create(&self, owner: &UserId, draft: SetDraft) -> Result<SpeciesSet, Error>;

    /// Replace the title and contents of a set owned by `caller`.
    async fn update(&self, caller: &UserId, id: &SetId, draft: SetDraft)
        -> Result<SpeciesSet, Error>;

    /// Delete a set owned by `caller`.
    async fn delete(&self, caller: &UserId, id: &SetId) -> Result<(), Error>;
}
