//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain
//! ports, so tests can swap in doubles without any I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, SessionAuthenticator, SetsCommand, SetsQuery, SignupService};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account registration.
    pub signup: Arc<dyn SignupService>,
    /// Credential login.
    pub login: Arc<dyn LoginService>,
    /// Bearer token verification.
    pub authenticator: Arc<dyn SessionAuthenticator>,
    /// Set mutations.
    pub sets: Arc<dyn SetsCommand>,
    /// Set reads.
    pub sets_query: Arc<dyn SetsQuery>,
}

/// Parameter object bundling the account ports, which are usually served by
/// a single implementation.
#[derive(Clone)]
pub struct AccountPorts {
    /// Account registration.
    pub signup: Arc<dyn SignupService>,
    /// Credential login.
    pub login: Arc<dyn LoginService>,
    /// Bearer token verification.
    pub authenticator: Arc<dyn SessionAuthenticator>,
}

impl HttpState {
    /// Assemble state from the account ports and the set command/query pair.
    pub fn new(
        accounts: AccountPorts,
        sets: Arc<dyn SetsCommand>,
        sets_query: Arc<dyn SetsQuery>,
    ) -> Self {
        let AccountPorts {
            signup,
            login,
            authenticator,
        } = accounts;
        Self {
            signup,
            login,
            authenticator,
            sets,
            sets_query,
        }
    }
}
