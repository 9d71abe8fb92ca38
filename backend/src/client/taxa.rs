//! Taxon detail aggregation.
//!
//! Resolves a list of taxon ids to their records and summaries with two
//! parallel fan-outs, joined in input order. A single failure fails the
//! whole aggregate.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::warn;
use url::Url;

use crate::domain::ports::{SummarySource, TaxonomySource};
use crate::domain::{Taxon, TaxonId, TaxonWithSummary, WikiSummary};

use super::{ClientError, QueryCache, QueryKey};

/// Summary lookup for one reference URL, cached under `("wikiSummary", url)`.
///
/// "No summary available" is cached as well, so a missing article is asked
/// for once.
#[derive(Clone)]
pub struct SummaryQuery {
    summaries: Arc<dyn SummarySource>,
    cache: Arc<QueryCache>,
}

impl SummaryQuery {
    pub fn new(summaries: Arc<dyn SummarySource>, cache: Arc<QueryCache>) -> Self {
        Self { summaries, cache }
    }

    pub async fn fetch(&self, url: &Url) -> Result<Option<WikiSummary>, ClientError> {
        self.cache
            .fetch_with(QueryKey::wiki_summary(url), || async {
                self.summaries.summary(url).await.map_err(|error| {
                    warn!(%url, %error, "summary lookup failed");
                    ClientError::from(error)
                })
            })
            .await
    }
}

/// Taxa plus summaries for a list of ids, cached under `("taxa", ids...)`.
pub struct TaxaQuery {
    taxonomy: Arc<dyn TaxonomySource>,
    summaries: SummaryQuery,
    cache: Arc<QueryCache>,
}

impl TaxaQuery {
    pub fn new(
        taxonomy: Arc<dyn TaxonomySource>,
        summaries: Arc<dyn SummarySource>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            taxonomy,
            summaries: SummaryQuery::new(summaries, Arc::clone(&cache)),
            cache,
        }
    }

    /// Fetch every taxon in `ids`, then every summary.
    ///
    /// Disabled when `ids` is `None` or empty: returns `Ok(None)` without a
    /// request.
    pub async fn fetch(
        &self,
        ids: Option<&[TaxonId]>,
    ) -> Result<Option<Vec<TaxonWithSummary>>, ClientError> {
        let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
            return Ok(None);
        };
        let joined = self
            .cache
            .fetch_with(QueryKey::taxa(ids), || async {
                let taxa = try_join_all(ids.iter().map(|id| self.taxon(id))).await?;
                try_join_all(taxa.into_iter().map(|taxon| self.with_summary(taxon))).await
            })
            .await?;
        Ok(Some(joined))
    }

    async fn taxon(&self, id: &TaxonId) -> Result<Taxon, ClientError> {
        self.taxonomy.taxon(id).await.map_err(|error| {
            warn!(taxon_id = %id, %error, "taxon lookup failed");
            ClientError::from(error)
        })
    }

    async fn with_summary(&self, taxon: Taxon) -> Result<TaxonWithSummary, ClientError> {
        let wiki_summary = match &taxon.wikipedia_url {
            Some(url) => self.summaries.fetch(url).await?,
            None => None,
        };
        Ok(TaxonWithSummary {
            taxon,
            wiki_summary,
        })
    }
}
