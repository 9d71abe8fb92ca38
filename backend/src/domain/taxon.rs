//! Read-only taxonomy records sourced from the external providers.

use serde::{Deserialize, Serialize};
use url::Url;

use super::species_set::TaxonId;

/// Rank name used for species-level taxa.
pub const SPECIES_RANK: &str = "species";

/// Photo attached to a taxon record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPhoto {
    /// Medium-sized image URL.
    pub medium_url: Url,
    /// Licence and author attribution.
    pub attribution: Option<String>,
}

/// A taxon as reported by the taxonomy provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxon {
    /// Provider identifier.
    pub id: TaxonId,
    /// Scientific name.
    pub name: String,
    /// Common name in the provider's default locale.
    pub preferred_common_name: Option<String>,
    /// Rank such as `species` or `genus`.
    pub rank: String,
    /// Reference article used for the summary lookup.
    pub wikipedia_url: Option<Url>,
    /// Representative photo.
    pub default_photo: Option<DefaultPhoto>,
}

impl Taxon {
    /// Whether this taxon is a species.
    pub fn is_species(&self) -> bool {
        self.rank == SPECIES_RANK
    }

    /// Common name when known, otherwise the scientific name.
    pub fn display_name(&self) -> &str {
        self.preferred_common_name.as_deref().unwrap_or(&self.name)
    }
}

/// One page of descendants of a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescendantsPage {
    /// Total matches across all pages.
    pub total_results: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used by the provider.
    pub per_page: u32,
    /// Taxa on this page.
    pub taxa: Vec<Taxon>,
}

impl DescendantsPage {
    /// Empty page, used when a search matches nothing.
    pub fn empty(page: u32) -> Self {
        Self {
            total_results: 0,
            page,
            per_page: 0,
            taxa: Vec::new(),
        }
    }

    /// Whether more pages follow this one.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page).saturating_mul(u64::from(self.per_page));
        self.per_page > 0 && seen < self.total_results
    }
}

/// Short article summary for a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiSummary {
    /// Reference URL the summary was resolved from.
    pub url: Url,
    /// Article title.
    pub title: String,
    /// Plain-text extract.
    pub extract: String,
}

/// Taxon joined with its summary, if one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonWithSummary {
    /// Taxon record.
    pub taxon: Taxon,
    /// Summary, absent when none is available.
    pub wiki_summary: Option<WikiSummary>,
}
