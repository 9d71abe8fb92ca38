//! Driving port for set reads.
use async_trait::async_trait;

use crate::domain::{Error, SetId, SpeciesSet, UserId};

/// Read access to sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SetsQuery: Send + Sync {
    /// Sets owned by `owner`.
    async fn list_for(&self, owner: &UserId) -> Result<Vec<SpeciesSet>, Error>;

    /// A single set by id.
    async fn get(&self, id: &SetId) -> Result<SpeciesSet, Error>;
}
