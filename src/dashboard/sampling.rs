use crate::api::SharedEntry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// How a drilldown picks which entries of a category to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrilldownSampling {
    /// A fresh subset every time the category is opened.
    #[default]
    Random,
    /// The same subset for a given category on every visit and every run.
    Seeded,
}

/// Pick `min(limit, bucket.len())` distinct entries from `bucket`.
///
/// The result keeps bucket order so a drilldown reads the same way the
/// catalog does.
pub fn sample_bucket<'a>(
    bucket: &'a [SharedEntry],
    limit: usize,
    category: &str,
    sampling: DrilldownSampling,
) -> Vec<&'a SharedEntry> {
    match sampling {
        DrilldownSampling::Random => sample_with(bucket, limit, &mut rand::thread_rng()),
        DrilldownSampling::Seeded => {
            let mut rng = StdRng::seed_from_u64(seed_for(category));
            sample_with(bucket, limit, &mut rng)
        }
    }
}

fn sample_with<'a, R: Rng + ?Sized>(
    bucket: &'a [SharedEntry],
    limit: usize,
    rng: &mut R,
) -> Vec<&'a SharedEntry> {
    let amount = limit.min(bucket.len());
    if amount == bucket.len() {
        return bucket.iter().collect();
    }

    let mut picked = rand::seq::index::sample(rng, bucket.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &bucket[i]).collect()
}

/// Stable seed for a category: the first 8 bytes of SHA-256 over its name.
fn seed_for(category: &str) -> u64 {
    let digest = Sha256::digest(category.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CatalogEntry, EnrichedEntry, EntryDetail};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn bucket(n: u64) -> Vec<SharedEntry> {
        (0..n)
            .map(|id| {
                Arc::new(
                    EnrichedEntry::from_parts(
                        CatalogEntry::new(id, format!("Game {id}")),
                        EntryDetail {
                            categories: vec!["Action".to_string()],
                            image_ref: "img".to_string(),
                            description: String::new(),
                        },
                    )
                    .unwrap(),
                )
            })
            .collect()
    }

    fn ids(sample: &[&SharedEntry]) -> Vec<u64> {
        sample.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_small_bucket_returned_whole() {
        let entries = bucket(3);
        let sample = sample_bucket(&entries, 10, "Action", DrilldownSampling::Random);
        assert_eq!(ids(&sample), vec![0, 1, 2]);
    }

    #[test]
    fn test_large_bucket_sampled_without_replacement() {
        let entries = bucket(40);
        for _ in 0..20 {
            let sample = sample_bucket(&entries, 10, "Action", DrilldownSampling::Random);
            let picked = ids(&sample);
            assert_eq!(picked.len(), 10);
            assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 10);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|id| *id < 40));
        }
    }

    #[test]
    fn test_seeded_is_reproducible_per_category() {
        let entries = bucket(100);
        let a = ids(&sample_bucket(&entries, 10, "Strategy", DrilldownSampling::Seeded));
        let b = ids(&sample_bucket(&entries, 10, "Strategy", DrilldownSampling::Seeded));
        assert_eq!(a, b);
        assert_ne!(seed_for("Strategy"), seed_for("Casual"));
    }

    #[test]
    fn test_zero_limit() {
        let entries = bucket(5);
        assert!(sample_bucket(&entries, 0, "Action", DrilldownSampling::Seeded).is_empty());
    }
}
