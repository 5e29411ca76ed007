use crate::api::SharedEntry;
use std::collections::HashMap;
use std::sync::Arc;

/// Entries grouped by category.
///
/// Categories keep first-seen order and each bucket keeps enrichment order,
/// so the index is fully determined by the order of its input. Buckets hold
/// `Arc` clones of the master list's entries; an entry with `k` categories
/// appears in `k` buckets. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    buckets: Vec<(String, Vec<SharedEntry>)>,
    positions: HashMap<String, usize>,
}

impl CategoryIndex {
    /// Group `entries` by category in a single pass.
    ///
    /// A category listed twice by the same entry is only counted once, so
    /// every entry appears exactly once in each of its buckets.
    pub fn build(entries: &[SharedEntry]) -> Self {
        let mut index = Self::default();

        for entry in entries {
            for (i, category) in entry.categories().iter().enumerate() {
                if entry.categories()[..i].contains(category) {
                    continue;
                }
                index.push(category, Arc::clone(entry));
            }
        }

        index
    }

    fn push(&mut self, category: &str, entry: SharedEntry) {
        match self.positions.get(category) {
            Some(&pos) => self.buckets[pos].1.push(entry),
            None => {
                self.positions
                    .insert(category.to_string(), self.buckets.len());
                self.buckets.push((category.to_string(), vec![entry]));
            }
        }
    }

    /// Entries tagged with `category`, or `None` if no entry carries it.
    pub fn get(&self, category: &str) -> Option<&[SharedEntry]> {
        self.positions
            .get(category)
            .map(|&pos| self.buckets[pos].1.as_slice())
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    /// `(category, bucket)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SharedEntry])> {
        self.buckets
            .iter()
            .map(|(name, bucket)| (name.as_str(), bucket.as_slice()))
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket sizes.
    pub fn total_memberships(&self) -> usize {
        self.buckets.iter().map(|(_, bucket)| bucket.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CatalogEntry, EnrichedEntry, EntryDetail};
    use proptest::prelude::*;

    fn entry(id: u64, categories: &[&str]) -> SharedEntry {
        let detail = EntryDetail {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            image_ref: format!("img{id}"),
            description: String::new(),
        };
        Arc::new(EnrichedEntry::from_parts(CatalogEntry::new(id, format!("Game {id}")), detail).unwrap())
    }

    fn ids(bucket: &[SharedEntry]) -> Vec<u64> {
        bucket.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_single_entry_scenario() {
        let entries = vec![entry(1, &["Action"])];
        let index = CategoryIndex::build(&entries);
        assert_eq!(index.len(), 1);
        assert_eq!(ids(index.get("Action").unwrap()), vec![1]);
        assert!(Arc::ptr_eq(&index.get("Action").unwrap()[0], &entries[0]));
    }

    #[test]
    fn test_multi_category_membership_and_order() {
        let entries = vec![
            entry(1, &["Action", "Indie"]),
            entry(2, &["Indie"]),
            entry(3, &["RPG", "Action"]),
        ];
        let index = CategoryIndex::build(&entries);

        let categories: Vec<&str> = index.categories().collect();
        assert_eq!(categories, vec!["Action", "Indie", "RPG"]);
        assert_eq!(ids(index.get("Action").unwrap()), vec![1, 3]);
        assert_eq!(ids(index.get("Indie").unwrap()), vec![1, 2]);
        assert_eq!(ids(index.get("RPG").unwrap()), vec![3]);
        assert_eq!(index.total_memberships(), 5);
        assert!(index.get("Strategy").is_none());
    }

    #[test]
    fn test_duplicate_category_in_one_entry_counted_once() {
        let entries = vec![entry(1, &["Action", "Action"])];
        let index = CategoryIndex::build(&entries);
        assert_eq!(ids(index.get("Action").unwrap()), vec![1]);
    }

    #[test]
    fn test_empty_input() {
        let index = CategoryIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.total_memberships(), 0);
    }

    proptest! {
        #[test]
        fn prop_every_entry_once_per_category_and_no_empty_buckets(
            tags in proptest::collection::vec(
                proptest::collection::vec(prop::sample::select(vec!["Action", "RPG", "Indie", "Casual", "Sports"]), 1..4),
                0..30,
            )
        ) {
            let entries: Vec<SharedEntry> = tags
                .iter()
                .enumerate()
                .map(|(i, cats)| entry(i as u64, cats))
                .collect();
            let index = CategoryIndex::build(&entries);

            for e in &entries {
                for c in e.categories() {
                    let bucket = index.get(c).unwrap();
                    prop_assert_eq!(bucket.iter().filter(|b| b.id() == e.id()).count(), 1);
                }
            }
            for (_, bucket) in index.iter() {
                prop_assert!(!bucket.is_empty());
                prop_assert!(bucket.windows(2).all(|w| w[0].id() < w[1].id()));
            }
            prop_assert!(index.total_memberships() >= entries.len());
        }
    }
}
