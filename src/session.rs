//! Session Composer
//!
//! Builds the ordered list of item ids for one practice session out of the
//! items that are due now or will be due within the near-due window.
//!
//! Ordering is randomized twice (whole pool, then a bounded prefix) and then
//! filtered by a soft tag anti-repetition rule: an item sharing a tag with the
//! previously appended item is dropped only when the session currently holds an
//! odd number of items. A clash is tolerated every other slot, never twice in a
//! row.

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{ItemMeta, Timestamp};

/// Items due within this many seconds of `now` count as near-due
pub const NEAR_DUE_WINDOW_SECS: i64 = 10 * 60 * 60;

/// Lower bound on the randomized candidate prefix
const MIN_SEED_SIZE: usize = 5;
const SEED_DIVISOR: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct PoolPartition<'a> {
    pub due: Vec<&'a ItemMeta>,
    pub near_due: Vec<&'a ItemMeta>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCounts {
    pub due: usize,
    pub near_due: usize,
    pub later: usize,
}

impl PoolPartition<'_> {
    pub fn len(&self) -> usize {
        self.due.len() + self.near_due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split items into due (`due_at <= now`) and near-due (within the window)
pub fn partition_pool(items: &[ItemMeta], now: Timestamp) -> PoolPartition<'_> {
    let horizon = now + Duration::seconds(NEAR_DUE_WINDOW_SECS);
    let mut partition = PoolPartition::default();

    for item in items {
        if item.due_at <= now {
            partition.due.push(item);
        } else if item.due_at <= horizon {
            partition.near_due.push(item);
        }
    }
    partition
}

pub fn pool_counts(items: &[ItemMeta], now: Timestamp) -> PoolCounts {
    let partition = partition_pool(items, now);
    PoolCounts {
        due: partition.due.len(),
        near_due: partition.near_due.len(),
        later: items.len() - partition.len(),
    }
}

/// Size of the randomized candidate prefix for a given cap
pub fn seed_size(cap: usize) -> usize {
    MIN_SEED_SIZE.max(cap / SEED_DIVISOR)
}

/// Compose an ordered session of at most `cap` item ids.
///
/// The result may be shorter than `cap`; see [`compose_with_fallback`].
pub fn compose_session_pool<R: Rng + ?Sized>(
    items: &[ItemMeta],
    now: Timestamp,
    cap: usize,
    rng: &mut R,
) -> Vec<String> {
    let cap = cap.max(1);
    let partition = partition_pool(items, now);
    let (due_count, near_due_count) = (partition.due.len(), partition.near_due.len());

    let mut mixed: Vec<&ItemMeta> = partition.due;
    mixed.extend(partition.near_due);
    mixed.shuffle(rng);

    mixed.truncate(seed_size(cap));
    let mut seed = mixed;
    seed.shuffle(rng);

    let session = walk_without_tag_runs(&seed, cap);

    tracing::debug!(
        due = due_count,
        near_due = near_due_count,
        seed = seed.len(),
        selected = session.len(),
        cap,
        "session pool composed"
    );
    session
}

/// [`compose_session_pool`] with the thread-local generator
pub fn compose_session_pool_thread_rng(
    items: &[ItemMeta],
    now: Timestamp,
    cap: usize,
) -> Vec<String> {
    compose_session_pool(items, now, cap, &mut rand::thread_rng())
}

/// Compose a session and top it up from a static list of ids when short
pub fn compose_with_fallback<R: Rng + ?Sized>(
    items: &[ItemMeta],
    now: Timestamp,
    cap: usize,
    rng: &mut R,
    fallback_ids: &[String],
) -> Vec<String> {
    let cap = cap.max(1);
    let mut session = compose_session_pool(items, now, cap, rng);
    let composed = session.len();

    for id in fallback_ids {
        if session.len() >= cap {
            break;
        }
        if id.is_empty() || session.contains(id) {
            continue;
        }
        session.push(id.clone());
    }

    if session.len() > composed {
        tracing::debug!(
            composed,
            topped_up = session.len() - composed,
            "session pool filled from fallback list"
        );
    }
    session
}

fn walk_without_tag_runs(seed: &[&ItemMeta], cap: usize) -> Vec<String> {
    let mut session: Vec<String> = Vec::with_capacity(cap.min(seed.len()));
    let mut prev: Option<&ItemMeta> = None;

    for &item in seed {
        if session.len() >= cap {
            break;
        }
        let clash = prev.is_some_and(|p| p.shares_tag_with(item));
        if clash && session.len() % 2 == 1 {
            continue;
        }
        session.push(item.id.clone());
        prev = Some(item);
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
    }

    fn item(id: &str, offset_secs: i64, tags: &[&str]) -> ItemMeta {
        ItemMeta::new(
            id,
            now() + Duration::seconds(offset_secs),
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_empty_items() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(compose_session_pool(&[], now(), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_partition_boundaries() {
        let items = vec![
            item("past", -60, &[]),
            item("now", 0, &[]),
            item("edge", NEAR_DUE_WINDOW_SECS, &[]),
            item("beyond", NEAR_DUE_WINDOW_SECS + 1, &[]),
        ];
        let partition = partition_pool(&items, now());
        let due: Vec<&str> = partition.due.iter().map(|i| i.id.as_str()).collect();
        let near: Vec<&str> = partition.near_due.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(due, vec!["past", "now"]);
        assert_eq!(near, vec!["edge"]);

        let counts = pool_counts(&items, now());
        assert_eq!(
            counts,
            PoolCounts {
                due: 2,
                near_due: 1,
                later: 1
            }
        );
    }

    #[test]
    fn test_seed_size() {
        assert_eq!(seed_size(1), 5);
        assert_eq!(seed_size(24), 5);
        assert_eq!(seed_size(25), 5);
        assert_eq!(seed_size(30), 6);
        assert_eq!(seed_size(100), 20);
    }

    #[test]
    fn test_far_future_items_excluded() {
        let items = vec![item("later", 3 * 86_400, &[]), item("also-later", 86_400, &[])];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(compose_session_pool(&items, now(), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_distinct_tags_take_whole_seed() {
        let items: Vec<ItemMeta> = (0..12)
            .map(|i| item(&format!("q{i}"), -(i as i64) * 60, &[format!("tag{i}").as_str()]))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let session = compose_session_pool(&items, now(), 10, &mut rng);
        // cap 10 -> seed prefix of 5
        assert_eq!(session.len(), 5);
        let unique: HashSet<&String> = session.iter().collect();
        assert_eq!(unique.len(), session.len());
    }

    #[test]
    fn test_shared_tag_everywhere_keeps_one() {
        let items: Vec<ItemMeta> = (0..8).map(|i| item(&format!("q{i}"), 0, &["torts"])).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let session = compose_session_pool(&items, now(), 8, &mut rng);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_cap_bounds_result() {
        let items: Vec<ItemMeta> = (0..50).map(|i| item(&format!("q{i}"), 0, &[])).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(compose_session_pool(&items, now(), 3, &mut rng).len(), 3);
        assert_eq!(compose_session_pool(&items, now(), 50, &mut rng).len(), 10);
        // zero cap is treated as one
        assert_eq!(compose_session_pool(&items, now(), 0, &mut rng).len(), 1);
    }

    #[test]
    fn test_exact_order_with_fixed_rng() {
        // a zero-step generator turns every shuffle into a left rotation by one
        let items = vec![
            item("a", 0, &["x"]),
            item("b", 0, &["x"]),
            item("c", 0, &["x"]),
            item("d", 0, &["x"]),
            item("e", 0, &["y"]),
            item("f", 0, &["y"]),
        ];
        let mut rng = StepRng::new(0, 0);
        let session = compose_session_pool(&items, now(), 10, &mut rng);
        assert_eq!(session, vec!["c", "e", "f", "b"]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let items: Vec<ItemMeta> = (0..30)
            .map(|i| {
                let tag = format!("t{}", i % 4);
                item(&format!("q{i}"), (i as i64 - 15) * 600, &[tag.as_str()])
            })
            .collect();
        let a = compose_session_pool(&items, now(), 25, &mut ChaCha8Rng::seed_from_u64(11));
        let b = compose_session_pool(&items, now(), 25, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tag_clash_tolerated_on_even_length_only() {
        let a = item("a", 0, &["x"]);
        let b = item("b", 0, &["x"]);
        let c = item("c", 0, &["y"]);
        let d = item("d", 0, &["y", "z"]);
        let e = item("e", 0, &["z"]);
        let seed = vec![&a, &b, &c, &d, &e];
        assert_eq!(walk_without_tag_runs(&seed, 10), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_untagged_items_never_clash() {
        let a = item("a", 0, &[]);
        let b = item("b", 0, &[]);
        let c = item("c", 0, &[]);
        let seed = vec![&a, &b, &c];
        assert_eq!(walk_without_tag_runs(&seed, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_fallback_tops_up_without_duplicates() {
        let items: Vec<ItemMeta> = (0..4).map(|i| item(&format!("q{i}"), 0, &["torts"])).collect();
        let fallback: Vec<String> = ["q0", "q1", "s1", "", "s2", "s3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let session = compose_with_fallback(&items, now(), 4, &mut rng, &fallback);
        assert_eq!(session.len(), 4);
        let unique: HashSet<&String> = session.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(!session.iter().any(|id| id.is_empty()));
    }
}
