use super::http::{read_limited_bytes, BodyError, Endpoints};
use super::types::EntryDetail;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

const MAX_DETAIL_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Anything that can resolve an application id to its store detail.
///
/// Implementations must not fail outward: every error resolves to
/// [`EntryDetail::empty`] so the enricher can drop the entry uniformly.
pub trait DetailSource {
    fn fetch_detail(&self, id: u64) -> impl Future<Output = EntryDetail> + Send;
}

/// Reasons a detail lookup fell back to the sentinel. Logged, never returned.
#[derive(Debug, Error)]
enum DetailError {
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Body error: {0}")]
    Body(#[from] BodyError),
    #[error("Malformed body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("No record for id in response")]
    MissingRecord,
    #[error("Store reported success=false")]
    Unsuccessful,
}

/// Detail source backed by the Steam storefront `appdetails` endpoint.
#[derive(Debug, Clone)]
pub struct StoreDetailFetcher {
    client: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl StoreDetailFetcher {
    pub fn new(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn try_fetch(&self, id: u64) -> Result<EntryDetail, DetailError> {
        let url = self.endpoints.detail_url(id);

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| DetailError::Timeout)?
            .map_err(DetailError::Network)?;

        if !response.status().is_success() {
            return Err(DetailError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_DETAIL_SIZE).await?;
        parse_detail(id, &bytes)
    }
}

impl DetailSource for StoreDetailFetcher {
    async fn fetch_detail(&self, id: u64) -> EntryDetail {
        match self.try_fetch(id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::debug!(id, error = %e, "Detail unavailable, using empty detail");
                EntryDetail::empty()
            }
        }
    }
}

/// Extract an [`EntryDetail`] from an `appdetails` body.
///
/// The body is keyed by the id as a string. Missing or mistyped optional
/// fields default to empty rather than failing.
fn parse_detail(id: u64, bytes: &[u8]) -> Result<EntryDetail, DetailError> {
    let body: Value = serde_json::from_slice(bytes)?;

    let record = body
        .get(id.to_string().as_str())
        .ok_or(DetailError::MissingRecord)?;

    if record.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(DetailError::Unsuccessful);
    }

    let Some(data) = record.get("data") else {
        return Ok(EntryDetail::empty());
    };

    let categories = data
        .get("genres")
        .and_then(Value::as_array)
        .map(|genres| {
            genres
                .iter()
                .filter_map(|g| g.get("description").and_then(Value::as_str))
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let string_field = |key: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(EntryDetail {
        categories,
        image_ref: string_field("header_image"),
        description: string_field("short_description"),
    })
}
