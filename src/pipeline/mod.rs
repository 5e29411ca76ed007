//! Turns a filtered catalog into the immutable data the dashboard reads.
//!
//! - [`enrich`] - throttled, strictly sequential detail lookups over a catalog prefix
//! - [`index`] - grouping of enriched entries by category
//! - [`context`] - the build-once, read-many [`DashboardContext`]

mod context;
mod enrich;
mod index;

pub use context::DashboardContext;
pub use enrich::{enrich, EnrichReport};
pub use index::CategoryIndex;
