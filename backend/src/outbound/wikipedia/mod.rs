//! Wikipedia REST summary adapter implementing the `SummarySource` port.

mod http_source;

pub use http_source::WikipediaSummarySource;
