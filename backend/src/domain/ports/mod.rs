//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Service`, `*Command`, `*Query`, `SessionAuthenticator`)
//! are called by inbound adapters; driven ports (`*Repository`, `*Source`)
//! are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod session_repository;
mod set_repository;
mod sets_command;
mod sets_query;
mod summary_source;
mod taxonomy_source;
mod user_repository;

#[cfg(test)]
pub use login_service::{MockLoginService, MockSessionAuthenticator, MockSignupService};
pub use login_service::{LoginService, SessionAuthenticator, SignupService};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRepository, SessionRepositoryError};
#[cfg(test)]
pub use set_repository::MockSetRepository;
pub use set_repository::{SetRepository, SetRepositoryError};
#[cfg(test)]
pub use sets_command::MockSetsCommand;
pub use sets_command::SetsCommand;
#[cfg(test)]
pub use sets_query::MockSetsQuery;
pub use sets_query::SetsQuery;
#[cfg(test)]
pub use summary_source::MockSummarySource;
pub use summary_source::{SummarySource, SummarySourceError};
#[cfg(test)]
pub use taxonomy_source::MockTaxonomySource;
pub use taxonomy_source::{TaxonomySource, TaxonomySourceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
