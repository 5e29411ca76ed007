use super::enrich::EnrichReport;
use super::index::CategoryIndex;
use crate::api::{EnrichedEntry, SharedEntry};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Everything the dashboard reads, built once at startup.
///
/// Immutable after construction and shared behind an `Arc`, so any number of
/// views can read it without coordination.
#[derive(Debug)]
pub struct DashboardContext {
    entries: Vec<SharedEntry>,
    index: CategoryIndex,
    catalog_size: usize,
    attempted: usize,
    store_base: String,
    built_at: DateTime<Utc>,
}

impl DashboardContext {
    /// Build the context from enriched entries.
    ///
    /// `store_base` is the store host used to link entry cards to their
    /// store pages (e.g. `https://store.steampowered.com/`).
    pub fn new(
        entries: Vec<EnrichedEntry>,
        catalog_size: usize,
        attempted: usize,
        store_base: impl Into<String>,
    ) -> Self {
        let entries: Vec<SharedEntry> = entries.into_iter().map(Arc::new).collect();
        let index = CategoryIndex::build(&entries);

        tracing::info!(
            entries = entries.len(),
            categories = index.len(),
            memberships = index.total_memberships(),
            "Category index built"
        );

        Self {
            entries,
            index,
            catalog_size,
            attempted,
            store_base: store_base.into(),
            built_at: Utc::now(),
        }
    }

    /// Build the context straight from an enrichment report.
    pub fn from_report(
        report: EnrichReport,
        catalog_size: usize,
        store_base: impl Into<String>,
    ) -> Self {
        Self::new(report.entries, catalog_size, report.attempted, store_base)
    }

    /// Master list of enriched entries, in enrichment order.
    pub fn entries(&self) -> &[SharedEntry] {
        &self.entries
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    /// Size of the filtered catalog the sample was drawn from.
    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Number of detail lookups made while enriching.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Store page for an application.
    pub fn store_page_url(&self, id: u64) -> String {
        let base = self.store_base.trim_end_matches('/');
        format!("{}/app/{}/", base, id)
    }
}
