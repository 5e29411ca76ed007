use super::http::{read_limited_bytes, BodyError, Endpoints};
use super::types::CatalogEntry;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// The full Steam app list is tens of megabytes; anything past this is not it.
const MAX_CATALOG_SIZE: usize = 64 * 1024 * 1024;

/// Errors that abort the run: without a catalog there is nothing to chart.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.). The URL is stripped
    /// so an API key in the query never reaches the error text.
    #[error("Request failed")]
    Network(#[source] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    /// Server kept answering 429 Too Many Requests
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    #[error("Response too large")]
    ResponseTooLarge,
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was not JSON or lacked `applist.apps`
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<BodyError> for CatalogError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::Network(e) => CatalogError::Network(e.without_url()),
            BodyError::TooLarge(_) => CatalogError::ResponseTooLarge,
            BodyError::Incomplete { expected, received } => {
                CatalogError::IncompleteResponse { expected, received }
            }
        }
    }
}

/// Backoff schedule for transient catalog failures (429, 5xx, truncated body).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2), // 2s, 4s, 8s
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Fetch and filter the catalog with the default retry policy.
pub async fn fetch_catalog(
    client: &reqwest::Client,
    endpoints: &Endpoints,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    fetch_catalog_with(client, endpoints, &RetryPolicy::default()).await
}

/// Fetch the app list, parse it, and drop unusable entries.
///
/// # Errors
///
/// - [`CatalogError::HttpStatus`] - 4xx immediately, 5xx once retries run out
/// - [`CatalogError::RateLimited`] - 429 after `max_retries`
/// - [`CatalogError::Timeout`] / [`CatalogError::Network`] - transport failures
/// - [`CatalogError::ResponseTooLarge`] - body exceeded the size cap
/// - [`CatalogError::Parse`] - body is not the expected JSON shape
pub async fn fetch_catalog_with(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    policy: &RetryPolicy,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let url = endpoints.catalog_url();
    let mut retry_count = 0;

    let bytes = loop {
        let response = tokio::time::timeout(policy.request_timeout, client.get(url.clone()).send())
            .await
            .map_err(|_| CatalogError::Timeout)?
            .map_err(|e| CatalogError::Network(e.without_url()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= policy.max_retries {
                return Err(CatalogError::RateLimited(policy.max_retries));
            }
            let delay = policy.delay_for(retry_count);
            tracing::warn!(
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Catalog request rate limited, backing off"
            );
            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if status.is_server_error() {
            if retry_count >= policy.max_retries {
                return Err(CatalogError::HttpStatus(status.as_u16()));
            }
            let delay = policy.delay_for(retry_count);
            tracing::warn!(
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Catalog server error, retrying after delay"
            );
            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        match read_limited_bytes(response, MAX_CATALOG_SIZE).await {
            Ok(bytes) => break bytes,
            Err(BodyError::Incomplete { expected, received })
                if retry_count < policy.max_retries =>
            {
                let delay = policy.delay_for(retry_count);
                tracing::debug!(
                    expected,
                    received,
                    attempt = retry_count + 1,
                    "Retrying incomplete catalog download"
                );
                tokio::time::sleep(delay).await;
                retry_count += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    let raw = parse_catalog(&bytes)?;
    let raw_count = raw.len();
    let entries = filter_catalog(raw);

    tracing::info!(
        raw = raw_count,
        kept = entries.len(),
        "Catalog fetched"
    );

    Ok(entries)
}

/// Parse the `applist.apps` array.
///
/// Items without a numeric `appid` or a string `name` are malformed and are
/// dropped here rather than failing the whole catalog.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogEntry>, CatalogError> {
    let body: Value =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let apps = body
        .get("applist")
        .and_then(|list| list.get("apps"))
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::Parse("missing applist.apps".to_string()))?;

    let mut malformed = 0usize;
    let entries: Vec<CatalogEntry> = apps
        .iter()
        .filter_map(|app| {
            let id = app.get("appid").and_then(Value::as_u64);
            let name = app.get("name").and_then(Value::as_str);
            match (id, name) {
                (Some(id), Some(name)) => Some(CatalogEntry::new(id, name)),
                _ => {
                    malformed += 1;
                    None
                }
            }
        })
        .collect();

    if malformed > 0 {
        tracing::debug!(malformed, "Catalog items without appid/name skipped");
    }

    Ok(entries)
}

/// Keep only listable entries, trimming their names. Order is preserved.
pub fn filter_catalog(raw: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    raw.into_iter()
        .filter(CatalogEntry::is_listable)
        .map(|entry| CatalogEntry {
            name: entry.name.trim().to_string(),
            ..entry
        })
        .collect()
}
