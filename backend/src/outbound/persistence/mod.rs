//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; row structs and the table schema never leave this module.
//!
//! ```ignore
//! use taxon_sets::outbound::persistence::{DbPool, DieselSetRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/taxon_sets")).await?;
//! let sets = DieselSetRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_session_repository;
mod diesel_set_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_set_repository::DieselSetRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
