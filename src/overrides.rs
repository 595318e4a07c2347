//! Session-scoped lock overrides
//!
//! A small keyed, single-use flag store. It is owned by the session/request
//! context and handed to the gating layer by reference; overrides never change
//! the computed lock status.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::topics::TopicCatalog;

pub struct OverrideStore {
    catalog: Arc<TopicCatalog>,
    flags: Mutex<HashSet<String>>,
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self::new(Arc::new(TopicCatalog::default()))
    }
}

impl OverrideStore {
    pub fn new(catalog: Arc<TopicCatalog>) -> Self {
        Self {
            catalog,
            flags: Mutex::new(HashSet::new()),
        }
    }

    /// Arm an override for `topic`. Returns false when the topic does not resolve.
    pub fn set_override(&self, topic: &str) -> bool {
        let Some(key) = self.catalog.canonicalize(topic) else {
            return false;
        };
        tracing::debug!(topic = %key, "lock override armed");
        self.flags.lock().insert(key);
        true
    }

    pub fn has_override(&self, topic: &str) -> bool {
        match self.catalog.canonicalize(topic) {
            Some(key) => self.flags.lock().contains(&key),
            None => false,
        }
    }

    /// Check and clear in one step; an override can be consumed once
    pub fn consume_override(&self, topic: &str) -> bool {
        match self.catalog.canonicalize(topic) {
            Some(key) => self.flags.lock().remove(&key),
            None => false,
        }
    }

    pub fn active_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.flags.lock().iter().cloned().collect();
        topics.sort();
        topics
    }

    /// Drop every override, e.g. when the session ends
    pub fn clear(&self) {
        self.flags.lock().clear();
    }
}

impl std::fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideStore")
            .field("active", &self.active_topics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_override_single_use() {
        let store = OverrideStore::default();
        assert!(store.set_override("contract-law"));
        assert!(store.has_override("contract-law"));
        assert!(store.consume_override("contract-law"));
        assert!(!store.consume_override("contract-law"));
        assert!(!store.has_override("contract-law"));
    }

    #[test]
    fn test_override_uses_canonical_key() {
        let store = OverrideStore::default();
        assert!(store.set_override("Contracts"));
        assert!(store.has_override("contract_law"));
        assert_eq!(store.active_topics(), vec!["contract-law".to_string()]);
        assert!(store.consume_override("CONTRACT LAW"));
    }

    #[test]
    fn test_unresolvable_topic_is_noop() {
        let store = OverrideStore::default();
        assert!(!store.set_override("underwater basket weaving"));
        assert!(!store.has_override("underwater basket weaving"));
        assert!(!store.consume_override("underwater basket weaving"));
        assert!(store.active_topics().is_empty());
    }

    #[test]
    fn test_clear() {
        let store = OverrideStore::default();
        store.set_override("torts");
        store.set_override("evidence");
        store.clear();
        assert!(!store.has_override("torts"));
        assert!(!store.has_override("evidence"));
    }

    #[test]
    fn test_concurrent_consume_happens_once() {
        let store = Arc::new(OverrideStore::default());
        store.set_override("torts");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.consume_override("torts"))
            })
            .collect();

        let consumed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(consumed, 1);
    }
}
