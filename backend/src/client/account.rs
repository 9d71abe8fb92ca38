//! Signup, login and logout hooks.

use std::sync::Arc;

use tracing::info;

use crate::domain::{AuthenticatedSession, LoginCredentials, LoginValidationError, SignupForm};

use super::mutations::{Effect, MutationState, Outcome, Route};
use super::ports::AccountApi;
use super::{ClientError, QueryCache, QueryKey, SessionHolder};

/// Account flows sharing one API client and session holder.
pub struct AccountFlow {
    api: Arc<dyn AccountApi>,
    session: Arc<SessionHolder>,
    cache: Arc<QueryCache>,
    state: MutationState,
}

impl AccountFlow {
    pub fn new(api: Arc<dyn AccountApi>, session: Arc<SessionHolder>, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            session,
            cache,
            state: MutationState::default(),
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// The form is validated locally first: a short password or a mismatched
    /// confirmation fails without a network call.
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Outcome<AuthenticatedSession> {
        let form = match SignupForm::try_from_parts(username, password, confirm_password) {
            Ok(form) => form,
            Err(error) => return self.fail(ClientError::validation(error.to_string())),
        };
        self.state.start();
        let result = async {
            self.api.sign_up(&form).await?;
            let credentials =
                LoginCredentials::try_from_parts(form.username().as_ref(), form.password())
                    .map_err(login_error)?;
            self.establish(&credentials).await
        }
        .await;
        self.finish(result)
    }

    /// Sign in and persist the session.
    pub async fn log_in(&self, username: &str, password: &str) -> Outcome<AuthenticatedSession> {
        let credentials = match LoginCredentials::try_from_parts(username, password) {
            Ok(credentials) => credentials,
            Err(error) => return self.fail(login_error(error)),
        };
        self.state.start();
        let result = self.establish(&credentials).await;
        self.finish(result)
    }

    /// Forget the session and every cached per-user query.
    pub fn log_out(&self) -> Result<Effect, ClientError> {
        self.session.clear()?;
        self.cache.invalidate(&QueryKey::sets());
        self.cache.invalidate(&QueryKey::new(["set"]));
        info!("signed out");
        Ok(Effect::Navigate(Route::Login))
    }

    async fn establish(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, ClientError> {
        let session = self.api.log_in(credentials).await?;
        self.session.set(session.clone())?;
        Ok(session)
    }

    fn finish(
        &self,
        result: Result<AuthenticatedSession, ClientError>,
    ) -> Outcome<AuthenticatedSession> {
        match result {
            Ok(session) => {
                self.state.settle(None);
                Outcome::Done {
                    value: session,
                    effect: Effect::Navigate(Route::Home),
                }
            }
            Err(error) => self.fail(error),
        }
    }

    fn fail<T>(&self, error: ClientError) -> Outcome<T> {
        self.state.settle(Some(error.clone()));
        Outcome::Failed(error)
    }
}

fn login_error(error: LoginValidationError) -> ClientError {
    ClientError::validation(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::signed_out;
    use crate::client::ports::MockAccountApi;
    use crate::domain::{SessionToken, User, UserId, Username};
    use rstest::rstest;

    fn session_for(username: &str) -> AuthenticatedSession {
        let user = User::new(UserId::random(), Username::new(username).expect("username"));
        AuthenticatedSession::new(SessionToken::generate(), &user)
    }

    fn flow(api: MockAccountApi) -> (AccountFlow, Arc<SessionHolder>) {
        let session = signed_out();
        (
            AccountFlow::new(Arc::new(api), Arc::clone(&session), Arc::new(QueryCache::new())),
            session,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn mismatched_passwords_make_no_network_call() {
        let mut api = MockAccountApi::new();
        api.expect_sign_up().never();
        api.expect_log_in().never();
        let (flow, _) = flow(api);

        let outcome = flow.sign_up("ada", "abc", "abd").await;
        assert_eq!(
            outcome,
            Outcome::Failed(ClientError::validation("passwords do not match"))
        );
        assert_eq!(
            flow.state().error_message().as_deref(),
            Some("passwords do not match")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn sign_up_logs_in_and_persists_session() {
        let mut api = MockAccountApi::new();
        api.expect_sign_up().times(1).returning(|form| {
            Ok(User::new(UserId::random(), form.username().clone()))
        });
        api.expect_log_in()
            .withf(|credentials| credentials.username() == "ada" && credentials.password() == "pw1")
            .times(1)
            .returning(|_| Ok(session_for("ada")));
        let (flow, holder) = flow(api);

        let outcome = flow.sign_up("ada", "pw1", "pw1").await;
        let (value, effect) = match outcome {
            Outcome::Done { value, effect } => (value, effect),
            other => panic!("expected success, got {other:?}"),
        };
        assert_eq!(effect, Effect::Navigate(Route::Home));
        assert_eq!(holder.get(), Some(value));
    }

    #[rstest]
    #[tokio::test]
    async fn taken_username_surfaces_message() {
        let mut api = MockAccountApi::new();
        api.expect_sign_up()
            .return_once(|_| Err(ClientError::validation("username taken")));
        api.expect_log_in().never();
        let (flow, holder) = flow(api);

        let outcome = flow.sign_up("ada", "pw1", "pw1").await;
        assert_eq!(outcome, Outcome::Failed(ClientError::validation("username taken")));
        assert!(holder.get().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn bad_credentials_fail_with_auth_error() {
        let mut api = MockAccountApi::new();
        api.expect_log_in()
            .return_once(|_| Err(ClientError::auth("invalid credentials")));
        let (flow, holder) = flow(api);

        let outcome = flow.log_in("ada", "nope").await;
        assert_eq!(outcome, Outcome::Failed(ClientError::auth("invalid credentials")));
        assert!(holder.get().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn log_out_clears_session_and_set_queries() {
        let mut api = MockAccountApi::new();
        api.expect_log_in().returning(|_| Ok(session_for("ada")));
        let session = signed_out();
        let cache = Arc::new(QueryCache::new());
        let flow = AccountFlow::new(Arc::new(api), Arc::clone(&session), Arc::clone(&cache));
        flow.log_in("ada", "pw1").await;
        cache.insert(QueryKey::sets(), 0_u8);
        cache.insert(QueryKey::results("owls", 1), 0_u8);

        assert_eq!(flow.log_out().expect("log out"), Effect::Navigate(Route::Login));
        assert!(session.get().is_none());
        assert_eq!(cache.len(), 1);
    }
}
