//! iNaturalist-style taxonomy provider adapter.
//!
//! Implements the `TaxonomySource` port over the provider's `/taxa` endpoints.

mod dto;
mod http_source;

pub use http_source::{DESCENDANTS_PER_PAGE, InaturalistTaxonomySource};
