//! Cached reads of the caller's sets.

use std::sync::Arc;

use crate::domain::{SessionToken, SetId, SpeciesSet};

use super::ports::SetsApi;
use super::{ClientError, QueryCache, QueryKey, SessionHolder};

pub(crate) fn require_token(session: &SessionHolder) -> Result<SessionToken, ClientError> {
    session
        .token()
        .ok_or_else(|| ClientError::auth("login required"))
}

/// One set by id, cached under `("set", id)`.
pub struct SetQuery {
    api: Arc<dyn SetsApi>,
    session: Arc<SessionHolder>,
    cache: Arc<QueryCache>,
}

impl SetQuery {
    pub fn new(api: Arc<dyn SetsApi>, session: Arc<SessionHolder>, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    pub async fn fetch(&self, id: &SetId) -> Result<SpeciesSet, ClientError> {
        let token = require_token(&self.session)?;
        self.cache
            .fetch_with(QueryKey::set(id), || async {
                self.api.get(&token, id).await
            })
            .await
    }
}

/// The signed-in user's sets, cached under `("sets")`.
pub struct SetsQuery {
    api: Arc<dyn SetsApi>,
    session: Arc<SessionHolder>,
    cache: Arc<QueryCache>,
}

impl SetsQuery {
    pub fn new(api: Arc<dyn SetsApi>, session: Arc<SessionHolder>, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    pub async fn fetch(&self) -> Result<Vec<SpeciesSet>, ClientError> {
        let token = require_token(&self.session)?;
        self.cache
            .fetch_with(QueryKey::sets(), || async { self.api.list(&token).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{signed_in, signed_out, stored_set};
    use crate::client::ports::MockSetsApi;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn sets_are_cached_until_invalidated() {
        let (session, user_id) = signed_in();
        let owned = stored_set(&user_id, "Birds", &["3", "7"]);
        let mut api = MockSetsApi::new();
        api.expect_list()
            .times(2)
            .returning(move |_| Ok(vec![owned.clone()]));

        let cache = Arc::new(QueryCache::new());
        let query = SetsQuery::new(Arc::new(api), session, Arc::clone(&cache));
        assert_eq!(query.fetch().await.expect("first").len(), 1);
        query.fetch().await.expect("cached");

        cache.invalidate(&QueryKey::sets());
        query.fetch().await.expect("refetched");
    }

    #[rstest]
    #[tokio::test]
    async fn set_query_requires_session() {
        let mut api = MockSetsApi::new();
        api.expect_get().never();

        let query = SetQuery::new(Arc::new(api), signed_out(), Arc::new(QueryCache::new()));
        let err = query.fetch(&SetId::random()).await.expect_err("no session");
        assert!(err.requires_login());
    }

    #[rstest]
    #[tokio::test]
    async fn set_query_surfaces_not_found() {
        let (session, _) = signed_in();
        let mut api = MockSetsApi::new();
        api.expect_get()
            .return_once(|_, _| Err(ClientError::not_found("set not found")));

        let query = SetQuery::new(Arc::new(api), session, Arc::new(QueryCache::new()));
        let err = query.fetch(&SetId::random()).await.expect_err("missing");
        assert_eq!(err, ClientError::not_found("set not found"));
    }
}
