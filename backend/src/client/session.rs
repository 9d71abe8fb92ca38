//! Signed-in session state shared by the hook layer.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::domain::{AuthenticatedSession, SessionToken};

use super::ClientError;
use super::ports::SessionStorage;

/// Session storage that lives only as long as the process.
#[derive(Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<AuthenticatedSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<AuthenticatedSession>, ClientError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &AuthenticatedSession) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Current session, mirrored to a [`SessionStorage`] on every change.
///
/// Constructed once at startup and handed to each hook that needs a token.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use taxon_sets::client::{MemorySessionStorage, SessionHolder};
///
/// let holder = SessionHolder::init(Arc::new(MemorySessionStorage::new())).unwrap();
/// assert!(holder.get().is_none());
/// ```
pub struct SessionHolder {
    current: Mutex<Option<AuthenticatedSession>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHolder {
    /// Load any persisted session from `storage`.
    pub fn init(storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let current = storage.load()?;
        Ok(Self {
            current: Mutex::new(current),
            storage,
        })
    }

    pub fn get(&self) -> Option<AuthenticatedSession> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<SessionToken> {
        self.get().map(|session| session.token)
    }

    /// Replace the current session and persist it.
    pub fn set(&self, session: AuthenticatedSession) -> Result<(), ClientError> {
        self.storage.save(&session)?;
        info!(username = %session.username, "session stored");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Forget the current session, in memory and in storage.
    pub fn clear(&self) -> Result<(), ClientError> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.storage.clear()
    }
}
