//! Driven port for species set persistence.
use async_trait::async_trait;

use crate::domain::{SetId, SpeciesSet, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by set repository adapters.
    pub enum SetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "set repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "set repository query failed: {message}",
    }
}

/// Storage for species sets.
///
/// Taxon id order is preserved exactly as written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Insert a new set.
    async fn insert(&self, set: &SpeciesSet) -> Result<(), SetRepositoryError>;

    /// Fetch a set by identifier.
    async fn find(&self, id: &SetId) -> Result<Option<SpeciesSet>, SetRepositoryError>;

    /// List sets owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<SpeciesSet>, SetRepositoryError>;

    /// Overwrite title and contents. Returns `false` when the set is gone.
    async fn update(&self, set: &SpeciesSet) -> Result<bool, SetRepositoryError>;

    /// Remove a set. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &SetId) -> Result<bool, SetRepositoryError>;
}
