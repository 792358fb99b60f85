//! Exact-text response cache.
//!
//! Keys are the raw question text: no trimming, no case folding. Entries are
//! never evicted or invalidated and live until the process exits.
//!
//! The lock is only held for the map operation itself, never while an answer
//! is being computed. Two concurrent requests for the same question may both
//! compute it; the later store wins.

use lru::LruCache;
use std::sync::{Mutex, MutexGuard};

pub struct ResponseCache {
    entries: Mutex<LruCache<String, String>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(LruCache::unbounded()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, LruCache<String, String>> {
        // A poisoned lock still holds a consistent map: every write is a single insert.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lookup(&self, question: &str) -> Option<String> {
        self.guard().get(question).cloned()
    }

    pub fn store(&self, question: &str, answer: &str) {
        self.guard().put(question.to_string(), answer.to_string());
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_lookup() {
        let cache = ResponseCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup("2+2"), None);

        cache.store("2+2", "4");
        assert_eq!(cache.lookup("2+2").as_deref(), Some("4"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_exact() {
        let cache = ResponseCache::new();
        cache.store("Привет", "a");

        assert_eq!(cache.lookup("привет"), None);
        assert_eq!(cache.lookup("Привет "), None);
    }

    #[test]
    fn test_no_eviction() {
        let cache = ResponseCache::new();
        for i in 0..10_000 {
            cache.store(&format!("q{}", i), "a");
        }
        assert_eq!(cache.len(), 10_000);
        assert_eq!(cache.lookup("q0").as_deref(), Some("a"));
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let cache = ResponseCache::new();
        cache.store("q", "first");
        cache.store("q", "second");
        assert_eq!(cache.lookup("q").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }
}
