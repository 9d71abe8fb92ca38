//! Explicit query cache.
//!
//! Entries are keyed by a normalised [`QueryKey`] and never go stale on their
//! own; mutations drop them with [`QueryCache::invalidate`]. Each entry is
//! replaced atomically under the cache lock, so readers see either the
//! previous or the next value. Concurrent misses on one key share a single
//! fetch: later callers wait on a per-key flight lock and read the value the
//! first caller stored.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;
use url::Url;

use crate::domain::{SetId, TaxonId};

use super::ClientError;

/// Ordered key segments, compared segment by segment.
///
/// # Examples
/// ```
/// use taxon_sets::client::QueryKey;
///
/// let page = QueryKey::results("birds", 2);
/// assert!(page.starts_with(&QueryKey::new(["results"])));
/// assert!(!page.starts_with(&QueryKey::sets()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// `("results", search, page)`.
    pub fn results(search: &str, page: u32) -> Self {
        Self::new(["results".to_owned(), search.to_owned(), page.to_string()])
    }

    /// `("taxa", id, id, ...)` in input order.
    pub fn taxa(ids: &[TaxonId]) -> Self {
        Self::new(std::iter::once("taxa".to_owned()).chain(ids.iter().map(ToString::to_string)))
    }

    /// `("wikiSummary", url)`.
    pub fn wiki_summary(url: &Url) -> Self {
        Self::new(["wikiSummary", url.as_str()])
    }

    /// `("set", id)`.
    pub fn set(id: &SetId) -> Self {
        Self::new(["set".to_owned(), id.to_string()])
    }

    /// `("sets")`.
    pub fn sets() -> Self {
        Self::new(["sets"])
    }

    /// Whether `prefix` matches the leading segments of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

type Entry = Arc<dyn Any + Send + Sync>;
type Flight = Arc<AsyncMutex<()>>;

/// Process-wide cache shared by every query hook.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    in_flight: Mutex<HashMap<QueryKey, Flight>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flights(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Flight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn join_flight(&self, key: &QueryKey) -> Flight {
        Arc::clone(self.flights().entry(key.clone()).or_default())
    }

    /// Forget the flight lock for `key` once no other caller holds it.
    fn land_flight(&self, key: &QueryKey, flight: &Flight) {
        let mut flights = self.flights();
        let idle = flights
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, flight) && Arc::strong_count(flight) <= 2);
        if idle {
            flights.remove(key);
        }
    }

    /// Cached value for `key`, if present and of type `T`.
    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.lock().get(key).cloned()?;
        entry.downcast_ref::<T>().cloned()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.lock().insert(key, Arc::new(value));
    }

    /// Return the cached value for `key` or run `fetch` and cache its result.
    ///
    /// Callers that miss while another fetch of `key` is running wait for it
    /// and reuse its value. Failures are not cached, so a waiter behind a
    /// failed fetch runs its own.
    pub async fn fetch_with<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(hit) = self.get::<T>(&key) {
            debug!(%key, "query cache hit");
            return Ok(hit);
        }
        let flight = self.join_flight(&key);
        let result = {
            let _boarding = flight.lock().await;
            if let Some(hit) = self.get::<T>(&key) {
                debug!(%key, "query joined in-flight fetch");
                Ok(hit)
            } else {
                debug!(%key, "query cache miss");
                let fetched = fetch().await;
                if let Ok(value) = &fetched {
                    self.insert(key.clone(), value.clone());
                }
                fetched
            }
        };
        self.land_flight(&key, &flight);
        result
    }

    /// Drop every entry whose key starts with `prefix`; returns how many went.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!(%prefix, removed, "query cache invalidated");
        removed
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
