//! Reqwest client for the taxon sets REST API, used by the hook layer.

mod client;
mod dto;

pub use client::RestApiClient;
