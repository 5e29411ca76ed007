//! Shared HTTP plumbing: client construction, endpoint layout, bounded body reads.

use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::{Position, Url};

const USER_AGENT: &str = concat!("steamdash/", env!("CARGO_PKG_VERSION"));

/// Errors from reading a response body under a size limit.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    TooLarge(usize),
    /// Fewer bytes arrived than Content-Length promised.
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    Incomplete { expected: u64, received: usize },
}

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(without_query).unwrap_or("initial"),
            to = %without_query(url),
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Scheme, host and path of `url`. Query strings may carry the API key and
/// are never logged.
pub(crate) fn without_query(url: &Url) -> &str {
    &url[..Position::AfterPath]
}

/// Build the HTTP client shared by the catalog and detail fetchers.
///
/// Requests are issued one at a time, so a single idle connection per host
/// is enough to keep the store connection warm between throttled calls.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(1)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(timeout)
        .build()
}

// ============================================================================
// Endpoints
// ============================================================================

/// Resolved URLs for the two Steam APIs the pipeline talks to.
///
/// The API key is only ever attached to the catalog request and is never
/// rendered by `Debug` (SecretString redacts itself).
#[derive(Debug, Clone)]
pub struct Endpoints {
    catalog: Url,
    detail: Url,
    store_base: Url,
    api_key: Option<SecretString>,
}

impl Endpoints {
    /// Default public Steam Web API host.
    pub const DEFAULT_API_BASE: &'static str = "https://api.steampowered.com";
    /// Default Steam storefront host.
    pub const DEFAULT_STORE_BASE: &'static str = "https://store.steampowered.com";

    /// Resolve endpoint URLs from the two base URLs.
    ///
    /// Base URLs may carry a path prefix (useful behind a proxy); it is kept.
    pub fn new(api_base: &str, store_base: &str) -> Result<Self, url::ParseError> {
        let api_base = as_directory(Url::parse(api_base)?);
        let store_base = as_directory(Url::parse(store_base)?);

        Ok(Self {
            catalog: api_base.join("ISteamApps/GetAppList/v2/")?,
            detail: store_base.join("api/appdetails")?,
            store_base,
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, key: Option<SecretString>) -> Self {
        self.api_key = key;
        self
    }

    /// URL of the full application list.
    pub fn catalog_url(&self) -> Url {
        let mut url = self.catalog.clone();
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }
        url
    }

    /// URL of the store detail record for one application.
    pub fn detail_url(&self, id: u64) -> Url {
        let mut url = self.detail.clone();
        url.query_pairs_mut().append_pair("appids", &id.to_string());
        url
    }

    /// Storefront root, always ending in `/`.
    pub fn store_base(&self) -> &str {
        self.store_base.as_str()
    }

    /// Whether an API key will be attached to catalog requests.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Ensure the path ends with `/` so `Url::join` appends rather than replaces.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ============================================================================
// Body reading
// ============================================================================

/// Read a response body, refusing anything larger than `limit` bytes.
pub async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, BodyError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(BodyError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(BodyError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(BodyError::Incomplete {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
