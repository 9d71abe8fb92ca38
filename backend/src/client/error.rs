//! Errors surfaced by the hook layer.
//!
//! Every hook reports failures as a [`ClientError`]; its `Display` text is the
//! message a UI shows next to the error flag.

use crate::domain::ports::{SummarySourceError, TaxonomySourceError, define_port_error};

define_port_error! {
    /// Failure reported by a query or mutation.
    pub enum ClientError {
        /// Input rejected locally or by the server (`400`).
        Validation { message: String } => "{message}",
        /// Missing, invalid or expired credentials (`401`).
        Auth { message: String } => "{message}",
        /// The resource does not exist (`404`).
        NotFound { message: String } => "{message}",
        /// The caller does not own the resource (`403`).
        Forbidden { message: String } => "{message}",
        /// The change collides with existing state; raised locally for
        /// duplicate taxa.
        Conflict { message: String } => "{message}",
        /// An external provider failed.
        Provider { message: String } => "provider unavailable: {message}",
        /// The REST API could not be reached or answered unexpectedly.
        Transport { message: String } => "request failed: {message}",
        /// The persisted session could not be read or written.
        Storage { message: String } => "session storage failed: {message}",
    }
}

impl ClientError {
    /// Whether the failure means the user must sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

impl From<TaxonomySourceError> for ClientError {
    fn from(error: TaxonomySourceError) -> Self {
        match error {
            TaxonomySourceError::NotFound { id } => Self::not_found(format!("taxon {id} not found")),
            other => Self::provider(other.to_string()),
        }
    }
}

impl From<SummarySourceError> for ClientError {
    fn from(error: SummarySourceError) -> Self {
        Self::provider(error.to_string())
    }
}
