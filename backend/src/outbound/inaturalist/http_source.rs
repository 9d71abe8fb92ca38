//! Reqwest-backed taxonomy source.
//!
//! This adapter owns transport details only: query shaping, timeout and HTTP
//! error mapping, and JSON decoding into domain taxa.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use super::dto::TaxaResponseDto;
use crate::domain::ports::{TaxonomySource, TaxonomySourceError};
use crate::domain::{DescendantsPage, SPECIES_RANK, Taxon, TaxonId};
use crate::outbound::http_support::{directory_url, status_message};

/// Page size requested when listing descendants.
pub const DESCENDANTS_PER_PAGE: u32 = 30;
const USER_AGENT: &str = concat!("taxon-sets/", env!("CARGO_PKG_VERSION"));

/// Taxonomy source issuing GET requests below one base URL, for example
/// `https://api.inaturalist.org/v1/`.
pub struct InaturalistTaxonomySource {
    client: Client,
    base: Url,
}

impl InaturalistTaxonomySource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base: directory_url(base),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TaxonomySourceError> {
        self.base
            .join(path)
            .map_err(|err| TaxonomySourceError::invalid_request(format!("bad endpoint {path}: {err}")))
    }

    async fn send(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, Vec<u8>), TaxonomySourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn get_taxa(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<TaxaResponseDto, TaxonomySourceError> {
        let (status, body) = self.send(url, query).await?;
        decode_success(status, body.as_ref())
    }
}

fn decode_success(status: StatusCode, body: &[u8]) -> Result<TaxaResponseDto, TaxonomySourceError> {
    if !status.is_success() {
        let error = map_status_error(status, body);
        warn!(%status, %error, "taxonomy provider request failed");
        return Err(error);
    }
    parse_taxa(body)
}

#[async_trait]
impl TaxonomySource for InaturalistTaxonomySource {
    async fn best_match(&self, query: &str) -> Result<Option<Taxon>, TaxonomySourceError> {
        let url = self.endpoint("taxa")?;
        let decoded = self
            .get_taxa(url, &[("q", query.to_owned()), ("per_page", "1".to_owned())])
            .await?;
        Ok(decoded.into_taxa().into_iter().next())
    }

    async fn descendants(
        &self,
        ancestor: &TaxonId,
        page: u32,
    ) -> Result<DescendantsPage, TaxonomySourceError> {
        let page = page.max(1);
        let url = self.endpoint("taxa")?;
        let query = [
            ("taxon_id", ancestor.to_string()),
            ("rank", SPECIES_RANK.to_owned()),
            ("page", page.to_string()),
            ("per_page", DESCENDANTS_PER_PAGE.to_string()),
        ];
        let decoded = self.get_taxa(url, &query).await?;
        Ok(decoded.into_page(page))
    }

    async fn taxon(&self, id: &TaxonId) -> Result<Taxon, TaxonomySourceError> {
        let url = self.endpoint(&format!("taxa/{id}"))?;
        let (status, body) = self.send(url, &[]).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(TaxonomySourceError::not_found(id.to_string()));
        }
        let decoded = decode_success(status, body.as_ref())?;
        decoded
            .into_taxa()
            .into_iter()
            .next()
            .ok_or_else(|| TaxonomySourceError::not_found(id.to_string()))
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Taxon>, TaxonomySourceError> {
        let url = self.endpoint("taxa/autocomplete")?;
        let decoded = self.get_taxa(url, &[("q", query.to_owned())]).await?;
        Ok(decoded.into_taxa())
    }
}

fn parse_taxa(body: &[u8]) -> Result<TaxaResponseDto, TaxonomySourceError> {
    serde_json::from_slice(body).map_err(|error| {
        TaxonomySourceError::decode(format!("invalid taxonomy JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> TaxonomySourceError {
    if error.is_timeout() {
        TaxonomySourceError::timeout(error.to_string())
    } else {
        TaxonomySourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TaxonomySourceError {
    let message = status_message(status.as_u16(), body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => TaxonomySourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TaxonomySourceError::timeout(message)
        }
        _ if status.is_client_error() => TaxonomySourceError::invalid_request(message),
        _ => TaxonomySourceError::transport(message),
    }
}
