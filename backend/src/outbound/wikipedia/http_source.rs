//! Reqwest-backed summary source.
//!
//! Reference URLs look like `https://en.wikipedia.org/wiki/Common_raven`; the
//! last path segment is the article title passed to
//! `{base}/page/summary/{title}`. A `404` means no summary is available.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::WikiSummary;
use crate::domain::ports::{SummarySource, SummarySourceError};
use crate::outbound::http_support::{directory_url, status_message};

const USER_AGENT: &str = concat!("taxon-sets/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SummaryDto {
    title: String,
    #[serde(default)]
    extract: String,
}

/// Summary source issuing GET requests below a REST base such as
/// `https://en.wikipedia.org/api/rest_v1/`.
pub struct WikipediaSummarySource {
    client: Client,
    base: Url,
}

impl WikipediaSummarySource {
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

    fn summary_url(&self, title: &str) -> Option<Url> {
        self.base.join(&format!("page/summary/{title}")).ok()
    }
}

/// Article title from a reference URL, still percent-encoded.
fn article_title(reference: &Url) -> Option<&str> {
    reference
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
}

#[async_trait]
impl SummarySource for WikipediaSummarySource {
    async fn summary(&self, reference: &Url) -> Result<Option<WikiSummary>, SummarySourceError> {
        let Some(url) = article_title(reference).and_then(|title| self.summary_url(title)) else {
            debug!(%reference, "reference URL has no article title");
            return Ok(None);
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(%status, %error, "summary provider request failed");
            return Err(error);
        }

        let decoded: SummaryDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            SummarySourceError::decode(format!("invalid summary JSON payload: {error}"))
        })?;
        Ok(Some(WikiSummary {
            url: reference.clone(),
            title: decoded.title,
            extract: decoded.extract,
        }))
    }
}

fn map_transport_error(error: reqwest::Error) -> SummarySourceError {
    if error.is_timeout() {
        SummarySourceError::timeout(error.to_string())
    } else {
        SummarySourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SummarySourceError {
    let message = status_message(status.as_u16(), body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => SummarySourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            SummarySourceError::timeout(message)
        }
        _ => SummarySourceError::transport(message),
    }
}
