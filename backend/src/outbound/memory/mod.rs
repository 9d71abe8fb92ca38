//! In-memory repositories used when no database URL is configured.
//!
//! Semantics match the Diesel adapters: usernames are unique, sets list in
//! creation order, and sessions are keyed by token fingerprint. State lives
//! for the lifetime of the process.

mod session_store;
mod set_store;
mod user_store;

pub use session_store::InMemorySessionRepository;
pub use set_store::InMemorySetRepository;
pub use user_store::InMemoryUserRepository;
