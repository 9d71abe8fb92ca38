//! Two-step search: free text to best-matching taxon, then a page of its
//! species descendants.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::domain::DescendantsPage;
use crate::domain::ports::TaxonomySource;

use super::{ClientError, QueryCache, QueryKey};

/// Paged search over the taxonomy provider.
///
/// Pages are cached forever under `("results", search, page)`, so moving
/// back to an earlier page never refetches. The last settled page is kept as
/// a placeholder while the next one loads.
pub struct ResultsQuery {
    taxonomy: Arc<dyn TaxonomySource>,
    cache: Arc<QueryCache>,
    previous: Mutex<Option<DescendantsPage>>,
}

impl ResultsQuery {
    pub fn new(taxonomy: Arc<dyn TaxonomySource>, cache: Arc<QueryCache>) -> Self {
        Self {
            taxonomy,
            cache,
            previous: Mutex::new(None),
        }
    }

    /// Fetch page `page` of results for `search`.
    ///
    /// Returns `Ok(None)` without touching the provider when `search` is
    /// blank. A search with no taxonomic match yields an empty page. Page `0`
    /// is treated as page `1`.
    pub async fn fetch(
        &self,
        search: &str,
        page: u32,
    ) -> Result<Option<DescendantsPage>, ClientError> {
        let search = search.trim();
        if search.is_empty() {
            return Ok(None);
        }
        let page = page.max(1);
        let key = QueryKey::results(search, page);
        let taxonomy = Arc::clone(&self.taxonomy);
        let result = self
            .cache
            .fetch_with(key, || async move {
                let Some(ancestor) = taxonomy.best_match(search).await? else {
                    debug!(search, "search matched no taxon");
                    return Ok(DescendantsPage::empty(page));
                };
                Ok(taxonomy.descendants(&ancestor.id, page).await?)
            })
            .await?;
        *self.previous.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        Ok(Some(result))
    }

    /// Most recently settled page, shown while a new page loads.
    pub fn placeholder(&self) -> Option<DescendantsPage> {
        self.previous
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::taxon;
    use crate::domain::TaxonId;
    use crate::domain::ports::{MockTaxonomySource, TaxonomySourceError};
    use rstest::rstest;

    fn page_of(page: u32, ids: &[u64]) -> DescendantsPage {
        DescendantsPage {
            total_results: 90,
            page,
            per_page: 30,
            taxa: ids.iter().map(|id| taxon(*id)).collect(),
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_search_stays_idle(#[case] search: &str) {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy.expect_best_match().never();
        taxonomy.expect_descendants().never();

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::new(QueryCache::new()));
        assert_eq!(query.fetch(search, 1).await.expect("idle"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn second_fetch_of_same_page_hits_cache() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy
            .expect_best_match()
            .times(1)
            .returning(|_| Ok(Some(taxon(3))));
        taxonomy
            .expect_descendants()
            .withf(|ancestor, page| ancestor == &TaxonId::from(3_u64) && *page == 2)
            .times(1)
            .returning(|_, page| Ok(page_of(page, &[10, 11])));

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::new(QueryCache::new()));
        let first = query.fetch("birds", 2).await.expect("first");
        let second = query.fetch("birds", 2).await.expect("second");
        assert_eq!(first, second);
        assert_eq!(first.map(|page| page.taxa.len()), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn no_match_yields_empty_page() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy.expect_best_match().return_once(|_| Ok(None));
        taxonomy.expect_descendants().never();

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::new(QueryCache::new()));
        let page = query.fetch("zzzz", 0).await.expect("empty").expect("page");
        assert_eq!(page, DescendantsPage::empty(1));
    }

    #[rstest]
    #[tokio::test]
    async fn provider_failure_is_not_cached() {
        let cache = Arc::new(QueryCache::new());
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy
            .expect_best_match()
            .times(1)
            .return_once(|_| Err(TaxonomySourceError::transport("502")));

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::clone(&cache));
        let err = query.fetch("birds", 1).await.expect_err("provider down");
        assert!(matches!(err, ClientError::Provider { .. }));
        assert!(cache.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn placeholder_holds_last_settled_page() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy
            .expect_best_match()
            .returning(|_| Ok(Some(taxon(3))));
        taxonomy
            .expect_descendants()
            .returning(|_, page| Ok(page_of(page, &[u64::from(page)])));

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::new(QueryCache::new()));
        assert!(query.placeholder().is_none());
        query.fetch("birds", 1).await.expect("page 1");
        query.fetch("birds", 2).await.expect("page 2");
        assert_eq!(query.placeholder().map(|page| page.page), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn paging_back_reuses_earlier_page_without_fetch() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy
            .expect_best_match()
            .times(2)
            .returning(|_| Ok(Some(taxon(3))));
        taxonomy
            .expect_descendants()
            .times(2)
            .returning(|_, page| Ok(page_of(page, &[u64::from(page) + 100])));
        let cache = Arc::new(QueryCache::new());

        let query = ResultsQuery::new(Arc::new(taxonomy), Arc::clone(&cache));
        let first = query.fetch("birds", 1).await.expect("page 1");
        query.fetch("birds", 2).await.expect("page 2");
        assert!(cache.contains(&QueryKey::results("birds", 1)));

        let back = query.fetch("birds", 1).await.expect("page 1 again");
        assert_eq!(back, first);
        assert_eq!(query.placeholder().map(|page| page.page), Some(1));
    }
}
