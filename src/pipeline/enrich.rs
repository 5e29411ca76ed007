use crate::api::{CatalogEntry, DetailSource, EnrichedEntry};
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of one enrichment batch.
#[derive(Debug, Default)]
pub struct EnrichReport {
    /// Entries with complete detail, in catalog order.
    pub entries: Vec<EnrichedEntry>,
    /// Number of detail lookups issued (the sample size actually used).
    pub attempted: usize,
    /// Lookups whose detail was incomplete and got dropped.
    pub skipped: usize,
}

/// Enriches a prefix of the catalog with store details.
///
/// Takes the first `sample_size` entries in catalog order, fetches each
/// detail strictly one at a time, and keeps an entry only when its detail has
/// at least one category and an image. A fixed `request_delay` separates
/// consecutive lookups so the store does not throttle or block us; expect
/// roughly `sample_size * (request_delay + latency)` of wall time.
///
/// # Arguments
///
/// * `source` - Where details come from (the store API, or a fake in tests)
/// * `catalog` - Filtered catalog, in response order
/// * `sample_size` - Prefix length to enrich
/// * `request_delay` - Pause between consecutive detail lookups
/// * `progress_tx` - Optional channel receiving `(completed, total)` after each lookup
pub async fn enrich<S: DetailSource>(
    source: &S,
    catalog: &[CatalogEntry],
    sample_size: usize,
    request_delay: Duration,
    progress_tx: Option<&mpsc::Sender<(usize, usize)>>,
) -> EnrichReport {
    let sample = &catalog[..sample_size.min(catalog.len())];
    let total = sample.len();
    let mut report = EnrichReport {
        entries: Vec::with_capacity(total),
        attempted: total,
        skipped: 0,
    };

    for (i, entry) in sample.iter().enumerate() {
        if i > 0 && !request_delay.is_zero() {
            tokio::time::sleep(request_delay).await;
        }

        let detail = source.fetch_detail(entry.id).await;
        match EnrichedEntry::from_parts(entry.clone(), detail) {
            Some(enriched) => report.entries.push(enriched),
            None => {
                report.skipped += 1;
                tracing::info!(id = entry.id, name = %entry.name, "Skipping entry with incomplete detail");
            }
        }

        if let Some(tx) = progress_tx {
            if let Err(e) = tx.send((i + 1, total)).await {
                tracing::warn!(error = %e, done = i + 1, total, "Progress channel send failed (receiver dropped)");
            }
        }
    }

    tracing::info!(
        attempted = report.attempted,
        kept = report.entries.len(),
        skipped = report.skipped,
        "Enrichment complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntryDetail;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Detail source answering from a fixed table and recording call times.
    struct FakeDetails {
        details: HashMap<u64, EntryDetail>,
        calls: Mutex<Vec<(u64, Instant)>>,
    }

    impl FakeDetails {
        fn new(details: Vec<(u64, EntryDetail)>) -> Self {
            Self {
                details: details.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn called_ids(&self) -> Vec<u64> {
            self.calls.lock().unwrap().iter().map(|(id, _)| *id).collect()
        }
    }

    impl DetailSource for FakeDetails {
        async fn fetch_detail(&self, id: u64) -> EntryDetail {
            self.calls.lock().unwrap().push((id, Instant::now()));
            self.details.get(&id).cloned().unwrap_or_default()
        }
    }

    fn complete(categories: &[&str], image: &str, description: &str) -> EntryDetail {
        EntryDetail {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            image_ref: image.to_string(),
            description: description.to_string(),
        }
    }

    fn catalog(n: u64) -> Vec<CatalogEntry> {
        (1..=n).map(|i| CatalogEntry::new(i, format!("Game {i}"))).collect()
    }

    #[tokio::test]
    async fn test_scenario_drops_sentinel_entry() {
        let source = FakeDetails::new(vec![(1, complete(&["Action"], "img1", "d1"))]);
        let catalog = vec![CatalogEntry::new(1, "Foo"), CatalogEntry::new(2, "Bar")];

        let report = enrich(&source, &catalog, 10, Duration::ZERO, None).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!(entry.id(), 1);
        assert_eq!(entry.name(), "Foo");
        assert_eq!(entry.categories(), ["Action".to_string()]);
        assert_eq!(entry.image_ref(), "img1");
        assert_eq!(entry.description(), "d1");
    }

    #[tokio::test]
    async fn test_takes_prefix_in_order() {
        let source = FakeDetails::new(
            (1..=6)
                .map(|i| (i, complete(&["Indie"], "img", "")))
                .collect(),
        );

        let report = enrich(&source, &catalog(6), 4, Duration::ZERO, None).await;

        assert_eq!(source.called_ids(), vec![1, 2, 3, 4]);
        let ids: Vec<u64> = report.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_incomplete_details_never_survive() {
        let source = FakeDetails::new(vec![
            (1, complete(&["Action"], "", "no image")),
            (2, complete(&[], "img", "no genres")),
            (3, complete(&["RPG"], "img", "")),
            (4, EntryDetail::empty()),
        ]);

        let report = enrich(&source, &catalog(5), 5, Duration::ZERO, None).await;

        let ids: Vec<u64> = report.entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(report.skipped, 4);
        assert!(report
            .entries
            .iter()
            .all(|e| !e.categories().is_empty() && !e.image_ref().is_empty()));
    }

    #[tokio::test]
    async fn test_sample_larger_than_catalog() {
        let source = FakeDetails::new(vec![(1, complete(&["Action"], "img", ""))]);
        let report = enrich(&source, &catalog(2), 100, Duration::ZERO, None).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(source.called_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_zero_sample_issues_no_requests() {
        let source = FakeDetails::new(vec![]);
        let report = enrich(&source, &catalog(3), 0, Duration::from_secs(1), None).await;
        assert_eq!(report.attempted, 0);
        assert!(report.entries.is_empty());
        assert!(source.called_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_between_requests_only() {
        let source = FakeDetails::new(vec![]);
        let start = Instant::now();

        enrich(&source, &catalog(3), 3, Duration::from_secs(1), None).await;

        // Two gaps for three requests; none before the first or after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls[0].1, start);
        assert_eq!(calls[1].1 - calls[0].1, Duration::from_secs(1));
        assert_eq!(calls[2].1 - calls[1].1, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_reports_progress() {
        let source = FakeDetails::new(vec![]);
        let (tx, mut rx) = mpsc::channel(8);

        enrich(&source, &catalog(3), 3, Duration::ZERO, Some(&tx)).await;
        drop(tx);

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }
        assert_eq!(updates, vec![(1, 3), (2, 3), (3, 3)]);
    }
}
