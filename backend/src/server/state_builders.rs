//! Builders wiring repositories into the HTTP state ports.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::DefaultClock;

use crate::domain::ports::{SessionRepository, SetRepository, SetsCommand, SetsQuery, UserRepository};
use crate::domain::{AccountService, SetsService};
use crate::inbound::http::state::{AccountPorts, HttpState};
use crate::outbound::memory::{
    InMemorySessionRepository, InMemorySetRepository, InMemoryUserRepository,
};
use crate::outbound::persistence::{
    DieselSessionRepository, DieselSetRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Serve all three account ports from one [`AccountService`].
fn account_ports<U, S>(users: U, sessions: S, session_ttl: TimeDelta) -> AccountPorts
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    let service = Arc::new(AccountService::new(
        Arc::new(users),
        Arc::new(sessions),
        Arc::new(DefaultClock),
        session_ttl,
    ));
    AccountPorts {
        signup: service.clone(),
        login: service.clone(),
        authenticator: service,
    }
}

fn set_ports<R>(repo: R) -> (Arc<dyn SetsCommand>, Arc<dyn SetsQuery>)
where
    R: SetRepository + 'static,
{
    let service = Arc::new(SetsService::new(Arc::new(repo)));
    (service.clone(), service)
}

/// Build handler state from Diesel repositories when a pool is configured,
/// otherwise from in-memory repositories.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let (accounts, (sets, sets_query)) = match &config.db_pool {
        Some(pool) => (
            account_ports(
                DieselUserRepository::new(pool.clone()),
                DieselSessionRepository::new(pool.clone()),
                config.session_ttl,
            ),
            set_ports(DieselSetRepository::new(pool.clone())),
        ),
        None => (
            account_ports(
                InMemoryUserRepository::new(),
                InMemorySessionRepository::new(),
                config.session_ttl,
            ),
            set_ports(InMemorySetRepository::new()),
        ),
    };
    HttpState::new(accounts, sets, sets_query)
}
