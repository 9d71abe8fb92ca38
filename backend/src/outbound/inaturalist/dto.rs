//! DTOs for decoding taxonomy provider responses.
//!
//! Responses share one envelope, `{total_results, page, per_page, results}`,
//! across search, lookup and autocomplete.

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::domain::{DefaultPhoto, DescendantsPage, Taxon, TaxonId};

#[derive(Debug, Deserialize)]
pub(super) struct TaxaResponseDto {
    #[serde(default)]
    pub(super) total_results: u64,
    #[serde(default)]
    pub(super) page: u32,
    #[serde(default)]
    pub(super) per_page: u32,
    #[serde(default)]
    pub(super) results: Vec<TaxonDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TaxonDto {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) preferred_common_name: Option<String>,
    pub(super) rank: String,
    pub(super) wikipedia_url: Option<String>,
    pub(super) default_photo: Option<PhotoDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoDto {
    pub(super) medium_url: Option<String>,
    pub(super) attribution: Option<String>,
}

impl TaxaResponseDto {
    pub(super) fn into_taxa(self) -> Vec<Taxon> {
        self.results.into_iter().map(TaxonDto::into_domain).collect()
    }

    pub(super) fn into_page(self, requested_page: u32) -> DescendantsPage {
        let page = if self.page == 0 { requested_page } else { self.page };
        DescendantsPage {
            total_results: self.total_results,
            page,
            per_page: self.per_page,
            taxa: self.results.into_iter().map(TaxonDto::into_domain).collect(),
        }
    }
}

fn parse_optional_url(raw: Option<String>, taxon_id: u64, field: &'static str) -> Option<Url> {
    let raw = raw.filter(|value| !value.trim().is_empty())?;
    match Url::parse(&raw) {
        Ok(url) => Some(url),
        Err(error) => {
            warn!(taxon_id, field, %error, "ignoring malformed provider URL");
            None
        }
    }
}

impl TaxonDto {
    fn into_domain(self) -> Taxon {
        let id = self.id;
        let default_photo = self.default_photo.and_then(|photo| {
            parse_optional_url(photo.medium_url, id, "default_photo.medium_url").map(|medium_url| {
                DefaultPhoto {
                    medium_url,
                    attribution: photo.attribution,
                }
            })
        });
        Taxon {
            id: TaxonId::from(id),
            name: self.name,
            preferred_common_name: self.preferred_common_name,
            rank: self.rank,
            wikipedia_url: parse_optional_url(self.wikipedia_url, id, "wikipedia_url"),
            default_photo,
        }
    }
}
