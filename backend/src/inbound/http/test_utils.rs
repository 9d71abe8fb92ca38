//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockLoginService, MockSessionAuthenticator, MockSetsCommand, MockSetsQuery, MockSignupService,
};
use crate::inbound::http::state::{AccountPorts, HttpState};

/// Port doubles that a test configures before building [`HttpState`].
#[derive(Default)]
pub struct TestPorts {
    pub signup: MockSignupService,
    pub login: MockLoginService,
    pub authenticator: MockSessionAuthenticator,
    pub sets: MockSetsCommand,
    pub sets_query: MockSetsQuery,
}

/// Build handler state from configured doubles.
pub fn mock_state(ports: TestPorts) -> HttpState {
    HttpState::new(
        AccountPorts {
            signup: Arc::new(ports.signup),
            login: Arc::new(ports.login),
            authenticator: Arc::new(ports.authenticator),
        },
        Arc::new(ports.sets),
        Arc::new(ports.sets_query),
    )
}
