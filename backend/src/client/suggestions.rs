//! Species autocomplete and the draft list behind the set builder.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::TaxonomySource;
use crate::domain::{Taxon, TaxonId, TaxonIds};

use super::ClientError;
use super::mutations::DuplicateGuard;

/// Autocomplete restricted to species-rank taxa.
pub struct SpeciesSuggestions {
    taxonomy: Arc<dyn TaxonomySource>,
}

impl SpeciesSuggestions {
    pub fn new(taxonomy: Arc<dyn TaxonomySource>) -> Self {
        Self { taxonomy }
    }

    /// Suggestions for `query`; blank input yields none without a request.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Taxon>, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let suggestions = self.taxonomy.autocomplete(query).await?;
        let total = suggestions.len();
        let species: Vec<Taxon> = suggestions.into_iter().filter(Taxon::is_species).collect();
        debug!(query, total, kept = species.len(), "filtered suggestions to species");
        Ok(species)
    }
}

/// Taxa picked for a set that has not been saved yet.
#[derive(Debug, Clone, Default)]
pub struct SetBuilder {
    picked: Vec<Taxon>,
}

impl SetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `taxon`, refusing one that was already picked.
    pub fn add(&mut self, taxon: Taxon) -> Result<(), ClientError> {
        DuplicateGuard::check(&self.ids(), &taxon.id)?;
        self.picked.push(taxon);
        Ok(())
    }

    pub fn remove(&mut self, id: &TaxonId) {
        self.picked.retain(|taxon| &taxon.id != id);
    }

    pub fn picked(&self) -> &[Taxon] {
        &self.picked
    }

    /// Ids in pick order, ready for a create request.
    pub fn ids(&self) -> TaxonIds {
        TaxonIds::from(
            self.picked
                .iter()
                .map(|taxon| taxon.id.clone())
                .collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::taxon;
    use crate::client::mutations::DUPLICATE_TAXON_MESSAGE;
    use crate::domain::ports::MockTaxonomySource;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn suggestions_keep_species_only() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy.expect_autocomplete().return_once(|_| {
            let mut genus = taxon(1);
            genus.rank = "genus".to_owned();
            Ok(vec![genus, taxon(2)])
        });

        let species = SpeciesSuggestions::new(Arc::new(taxonomy))
            .fetch("strix")
            .await
            .expect("suggestions");
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].id, TaxonId::from(2_u64));
    }

    #[rstest]
    #[tokio::test]
    async fn blank_query_skips_provider() {
        let mut taxonomy = MockTaxonomySource::new();
        taxonomy.expect_autocomplete().never();

        let species = SpeciesSuggestions::new(Arc::new(taxonomy))
            .fetch(" ")
            .await
            .expect("suggestions");
        assert!(species.is_empty());
    }

    #[rstest]
    fn builder_refuses_duplicates_and_keeps_order() {
        let mut builder = SetBuilder::new();
        builder.add(taxon(7)).expect("first");
        builder.add(taxon(3)).expect("second");
        let err = builder.add(taxon(7)).expect_err("duplicate");
        assert_eq!(err, ClientError::conflict(DUPLICATE_TAXON_MESSAGE));

        builder.remove(&TaxonId::from(7_u64));
        let ids: Vec<String> = builder.ids().into_iter().map(String::from).collect();
        assert_eq!(ids, vec!["3"]);
    }
}
