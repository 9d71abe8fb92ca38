//! Set mutation hooks.
//!
//! Each hook owns its own pending and error flags and returns an
//! [`Outcome`] describing the single side effect the caller should run.
//! Successful mutations invalidate the cached set queries before returning.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::domain::{
    SetDraft, SetId, SetTitle, SessionToken, SpeciesSet, SpeciesSetValidationError, Taxon,
    TaxonId, TaxonIds,
};

use super::ports::SetsApi;
use super::sets::require_token;
use super::{ClientError, QueryCache, QueryKey, SessionHolder};

/// Message shown when a taxon is added to a set that already holds it.
pub const DUPLICATE_TAXON_MESSAGE: &str = "That species is already in the set.";

/// Screens a caller can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Profile,
    Login,
    Set(SetId),
}

/// Side effect to perform once after a mutation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Navigate(Route),
    CloseModal,
    Stay,
}

/// Result of triggering a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The server accepted the change.
    Done { value: T, effect: Effect },
    /// The change was rejected; the hook's error flag carries the message.
    Failed(ClientError),
    /// No valid session; the caller should route to the login screen.
    LoginRequired,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Snapshot of a hook's flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationStatus {
    pub pending: bool,
    pub error: Option<ClientError>,
}

/// Pending and error flags of one mutation hook.
#[derive(Debug, Default)]
pub struct MutationState {
    status: Mutex<MutationStatus>,
}

impl MutationState {
    pub fn status(&self) -> MutationStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status().pending
    }

    /// Message to display next to the trigger, if the last attempt failed.
    pub fn error_message(&self) -> Option<String> {
        self.status().error.map(|error| error.to_string())
    }

    pub(crate) fn start(&self) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = MutationStatus {
            pending: true,
            error: None,
        };
    }

    pub(crate) fn settle(&self, error: Option<ClientError>) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = MutationStatus {
            pending: false,
            error,
        };
    }
}

/// Rejects adding a taxon that a set already contains.
///
/// Update hooks append without deduplicating; callers run this check first
/// so a duplicate never reaches the server.
///
/// # Examples
/// ```
/// use taxon_sets::client::DuplicateGuard;
/// use taxon_sets::domain::{TaxonId, TaxonIds};
///
/// let ids = TaxonIds::parse(["3", "7"]).unwrap();
/// assert!(DuplicateGuard::check(&ids, &TaxonId::from(7_u64)).is_err());
/// assert!(DuplicateGuard::check(&ids, &TaxonId::from(9_u64)).is_ok());
/// ```
pub struct DuplicateGuard;

impl DuplicateGuard {
    pub fn check(ids: &TaxonIds, candidate: &TaxonId) -> Result<(), ClientError> {
        if ids.contains(candidate) {
            return Err(ClientError::conflict(DUPLICATE_TAXON_MESSAGE));
        }
        Ok(())
    }
}

/// Collaborators shared by every mutation hook.
#[derive(Clone)]
pub struct MutationContext {
    api: Arc<dyn SetsApi>,
    session: Arc<SessionHolder>,
    cache: Arc<QueryCache>,
}

impl MutationContext {
    pub fn new(api: Arc<dyn SetsApi>, session: Arc<SessionHolder>, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    async fn run<T, F, Fut>(
        &self,
        state: &MutationState,
        invalidate: &[QueryKey],
        effect: impl FnOnce(&T) -> Effect,
        call: F,
    ) -> Outcome<T>
    where
        F: FnOnce(Arc<dyn SetsApi>, SessionToken) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        state.start();
        let token = match require_token(&self.session) {
            Ok(token) => token,
            Err(error) => {
                state.settle(Some(error));
                return Outcome::LoginRequired;
            }
        };
        match call(Arc::clone(&self.api), token).await {
            Ok(value) => {
                for key in invalidate {
                    self.cache.invalidate(key);
                }
                state.settle(None);
                let effect = effect(&value);
                Outcome::Done { value, effect }
            }
            Err(error) => {
                warn!(%error, "set mutation failed");
                state.settle(Some(error.clone()));
                if error.requires_login() {
                    Outcome::LoginRequired
                } else {
                    Outcome::Failed(error)
                }
            }
        }
    }
}

fn title_error(error: SpeciesSetValidationError) -> ClientError {
    ClientError::validation(error.to_string())
}

fn reject<T>(state: &MutationState, error: ClientError) -> Outcome<T> {
    state.settle(Some(error.clone()));
    Outcome::Failed(error)
}

/// Creates a set from a title and ids; navigates to the caller's chosen
/// route on success.
pub struct CreateSet {
    context: MutationContext,
    state: MutationState,
    after_create: Route,
}

impl CreateSet {
    pub fn new(context: MutationContext, after_create: Route) -> Self {
        Self {
            context,
            state: MutationState::default(),
            after_create,
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn trigger(&self, title: &str, taxon_ids: TaxonIds) -> Outcome<SpeciesSet> {
        let title = match SetTitle::new(title) {
            Ok(title) => title,
            Err(error) => return reject(&self.state, title_error(error)),
        };
        let draft = SetDraft { title, taxon_ids };
        let route = self.after_create.clone();
        self.context
            .run(
                &self.state,
                &[QueryKey::sets()],
                |_| Effect::Navigate(route),
                |api, token| async move {
                    let set = api.create(&token, &draft).await?;
                    info!(set_id = %set.id, "set created");
                    Ok(set)
                },
            )
            .await
    }
}

/// Creates a single-taxon set from a search result; closes the modal.
pub struct CreateSetFromSearch {
    context: MutationContext,
    state: MutationState,
}

impl CreateSetFromSearch {
    pub fn new(context: MutationContext) -> Self {
        Self {
            context,
            state: MutationState::default(),
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn trigger(&self, taxon: &Taxon, title: &str) -> Outcome<SpeciesSet> {
        let title = match SetTitle::new(title) {
            Ok(title) => title,
            Err(error) => return reject(&self.state, title_error(error)),
        };
        let draft = SetDraft {
            title,
            taxon_ids: TaxonIds::from(vec![taxon.id.clone()]),
        };
        self.context
            .run(
                &self.state,
                &[QueryKey::sets()],
                |_| Effect::CloseModal,
                |api, token| async move { api.create(&token, &draft).await },
            )
            .await
    }
}

/// Appends a search result to an existing set; closes the modal.
///
/// Does not deduplicate; run [`DuplicateGuard::check`] first.
pub struct UpdateSetFromSearch {
    context: MutationContext,
    state: MutationState,
}

impl UpdateSetFromSearch {
    pub fn new(context: MutationContext) -> Self {
        Self {
            context,
            state: MutationState::default(),
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn trigger(&self, taxon: &Taxon, set: &SpeciesSet) -> Outcome<SpeciesSet> {
        let mut draft = set.to_draft();
        draft.taxon_ids = draft.taxon_ids.appended(taxon.id.clone());
        let id = set.id;
        self.context
            .run(
                &self.state,
                &[QueryKey::sets(), QueryKey::set(&id)],
                |_| Effect::CloseModal,
                |api, token| async move { api.update(&token, &id, &draft).await },
            )
            .await
    }
}

/// Removes one taxon from a set; the view stays where it is.
pub struct RemoveTaxon {
    context: MutationContext,
    state: MutationState,
}

impl RemoveTaxon {
    pub fn new(context: MutationContext) -> Self {
        Self {
            context,
            state: MutationState::default(),
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn trigger(&self, taxon_id: &TaxonId, set: &SpeciesSet) -> Outcome<SpeciesSet> {
        let mut draft = set.to_draft();
        draft.taxon_ids = draft.taxon_ids.without(taxon_id);
        let id = set.id;
        self.context
            .run(
                &self.state,
                &[QueryKey::sets(), QueryKey::set(&id)],
                |_| Effect::Stay,
                |api, token| async move { api.update(&token, &id, &draft).await },
            )
            .await
    }
}

/// Deletes a set, then navigates to the route supplied by the caller.
pub struct DeleteSet {
    context: MutationContext,
    state: MutationState,
    after_delete: Route,
}

impl DeleteSet {
    pub fn new(context: MutationContext, after_delete: Route) -> Self {
        Self {
            context,
            state: MutationState::default(),
            after_delete,
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn trigger(&self, id: &SetId) -> Outcome<()> {
        let id = *id;
        let route = self.after_delete.clone();
        self.context
            .run(
                &self.state,
                &[QueryKey::set(&id), QueryKey::sets()],
                |_| Effect::Navigate(route),
                |api, token| async move {
                    api.delete(&token, &id).await?;
                    info!(set_id = %id, "set deleted");
                    Ok(())
                },
            )
            .await
    }
}
