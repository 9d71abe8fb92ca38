//! Outbound adapters implementing domain and client ports for external
//! infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used without a database
//! - **inaturalist** / **wikipedia**: reqwest-backed provider sources
//! - **rest_api**: reqwest client for the REST API, used by the hook layer
//! - **session_file**: JSON session persistence for the command-line client
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub(crate) mod http_support;
pub mod inaturalist;
pub mod memory;
pub mod persistence;
pub mod rest_api;
pub mod session_file;
pub mod wikipedia;
