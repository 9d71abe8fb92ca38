//! Taxon sets: a REST API for curated species sets and the data-fetch hook
//! layer that drives it.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
