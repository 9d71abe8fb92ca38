//! Driven port for the external summary provider.
use async_trait::async_trait;
use url::Url;

use crate::domain::WikiSummary;

use super::define_port_error;

define_port_error! {
    /// Errors raised by summary provider adapters.
    pub enum SummarySourceError {
        /// Request timed out.
        Timeout { message: String } => "summary provider timed out: {message}",
        /// Provider rate limited the caller.
        RateLimited { message: String } => "summary provider rate limited: {message}",
        /// Transport or server failure.
        Transport { message: String } => "summary provider transport failed: {message}",
        /// Response body could not be decoded.
        Decode { message: String } => "summary provider response invalid: {message}",
    }
}

/// Article summaries keyed by reference URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Summary for `reference`, or `None` when the provider has none.
    async fn summary(&self, reference: &Url) -> Result<Option<WikiSummary>, SummarySourceError>;
}
