use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// Catalog
// ============================================================================

/// An application listed in the Steam catalog that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Whether this entry is usable: a non-blank name that does not mark an
    /// internal/test application.
    pub fn is_listable(&self) -> bool {
        let trimmed = self.name.trim();
        !trimmed.is_empty() && !trimmed.to_lowercase().contains("test")
    }
}

// ============================================================================
// Details
// ============================================================================

/// Store metadata for a single application.
///
/// Every failure path of the detail fetcher collapses to [`EntryDetail::empty`],
/// which the enricher then drops like any other incomplete detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDetail {
    pub categories: Vec<String>,
    pub image_ref: String,
    pub description: String,
}

impl EntryDetail {
    /// The sentinel returned when a detail could not be fetched or parsed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the detail carries everything the dashboard needs.
    pub fn is_complete(&self) -> bool {
        !self.categories.is_empty() && !self.image_ref.is_empty()
    }
}

// ============================================================================
// Enriched entries
// ============================================================================

/// A catalog entry joined with its complete store detail.
///
/// Fields are private so the only way to obtain one is [`EnrichedEntry::from_parts`],
/// which enforces non-empty categories and image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedEntry {
    id: u64,
    name: String,
    categories: Vec<String>,
    image_ref: String,
    description: String,
}

impl EnrichedEntry {
    /// Join a catalog entry with its detail, or `None` if the detail is incomplete.
    pub fn from_parts(entry: CatalogEntry, detail: EntryDetail) -> Option<Self> {
        if !detail.is_complete() {
            return None;
        }
        Some(Self {
            id: entry.id,
            name: entry.name,
            categories: detail.categories,
            image_ref: detail.image_ref,
            description: detail.description,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Entries are shared between the master list and every category bucket.
pub type SharedEntry = Arc<EnrichedEntry>;
