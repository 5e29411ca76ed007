//! Remote Steam APIs: the application catalog and per-application store details.
//!
//! - [`catalog`] - one-shot fetch of the app list, fatal on failure
//! - [`detail`] - per-id store detail, never fails outward
//! - [`http`] - client construction, endpoint layout, bounded body reads
//!
//! # Example
//!
//! ```ignore
//! use steamdash::api::{build_client, fetch_catalog, Endpoints, StoreDetailFetcher};
//!
//! let endpoints = Endpoints::new(Endpoints::DEFAULT_API_BASE, Endpoints::DEFAULT_STORE_BASE)?;
//! let client = build_client(Duration::from_secs(30))?;
//! let catalog = fetch_catalog(&client, &endpoints).await?;
//! let details = StoreDetailFetcher::new(client, endpoints);
//! ```

mod catalog;
mod detail;
mod http;
mod types;

pub use catalog::{
    fetch_catalog, fetch_catalog_with, filter_catalog, parse_catalog, CatalogError, RetryPolicy,
};
pub use detail::{DetailSource, StoreDetailFetcher};
pub use http::{build_client, read_limited_bytes, BodyError, Endpoints};
pub use types::{CatalogEntry, EnrichedEntry, EntryDetail, SharedEntry};
