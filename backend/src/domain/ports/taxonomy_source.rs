//! Driven port for the external taxonomy provider.
//!
//! The provider is an opaque HTTP service; adapters own request shaping and
//! decoding while callers only see domain taxa.

use async_trait::async_trait;

use crate::domain::{DescendantsPage, Taxon, TaxonId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by taxonomy provider adapters.
    pub enum TaxonomySourceError {
        /// Request timed out.
        Timeout { message: String } => "taxonomy provider timed out: {message}",
        /// Provider rate limited the caller.
        RateLimited { message: String } => "taxonomy provider rate limited: {message}",
        /// Provider rejected the request.
        InvalidRequest { message: String } => "taxonomy provider rejected request: {message}",
        /// The requested taxon does not exist.
        NotFound { id: String } => "taxon {id} not found",
        /// Transport or server failure.
        Transport { message: String } => "taxonomy provider transport failed: {message}",
        /// Response body could not be decoded.
        Decode { message: String } => "taxonomy provider response invalid: {message}",
    }
}

/// Lookups against the taxonomy provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    /// Resolve free text to the single best-matching taxon.
    async fn best_match(&self, query: &str) -> Result<Option<Taxon>, TaxonomySourceError>;

    /// Page through descendants of `ancestor`. `page` is 1-based.
    async fn descendants(
        &self,
        ancestor: &TaxonId,
        page: u32,
    ) -> Result<DescendantsPage, TaxonomySourceError>;

    /// Fetch one taxon record.
    async fn taxon(&self, id: &TaxonId) -> Result<Taxon, TaxonomySourceError>;

    /// Autocomplete suggestions for free text.
    async fn autocomplete(&self, query: &str) -> Result<Vec<Taxon>, TaxonomySourceError>;
}
