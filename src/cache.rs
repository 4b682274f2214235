use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classifier::Classify;
use crate::error::Result;
use crate::types::ParsedAgent;

/// Default number of distinct user agents kept by [`ResultCache`].
pub const DEFAULT_CACHE_SIZE: usize = 10_000;

/// Counters reported by [`ResultCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Bounded LRU cache in front of a [`Classify`] implementation, keyed by the
/// exact raw string.
///
/// The mutex is held only for the map/recency update; classification of a
/// miss runs unlocked, so racing misses on one key may classify twice.
pub struct ResultCache<C> {
    classifier: C,
    entries: Mutex<LruCache<String, Arc<ParsedAgent>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: Classify> ResultCache<C> {
    /// A zero `capacity` is rounded up to one; configuration rejects it
    /// before it gets here.
    pub fn new(classifier: C, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            classifier,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Shared, read-only result for `raw`, classifying it on a miss.
    pub fn lookup(&self, raw: &str) -> Result<Arc<ParsedAgent>> {
        if let Some(agent) = self.lock().get(raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(agent));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(user_agent = raw, "user agent cache miss");
        let agent = Arc::new(self.classifier.classify(raw)?);
        self.lock().put(raw.to_owned(), Arc::clone(&agent));
        Ok(agent)
    }

    /// Like [`lookup`](Self::lookup) but hands back a private deep copy the
    /// caller may mutate freely.
    pub fn lookup_owned(&self, raw: &str) -> Result<ParsedAgent> {
        self.lookup(raw).map(|agent| ParsedAgent::clone(&agent))
    }

    /// Whether `raw` is cached, without touching recency.
    pub fn contains(&self, raw: &str) -> bool {
        self.lock().peek(raw).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: entries.len(),
            capacity: entries.cap().get(),
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    // No user code runs under the lock, so a poisoned one is still consistent.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<ParsedAgent>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{OsInfo, VersionInfo};
    use std::sync::atomic::AtomicUsize;

    /// Classifier that counts calls and echoes the input as the name.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Classify for Counting {
        fn classify(&self, raw: &str) -> Result<ParsedAgent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if raw == "boom" {
                return Err(Error::Classification {
                    input: raw.to_owned(),
                    source: fancy_regex::Regex::new("(").unwrap_err(),
                });
            }
            Ok(ParsedAgent {
                name: raw.to_owned(),
                version: VersionInfo {
                    major: Some("1".into()),
                    ..Default::default()
                },
                os: OsInfo {
                    name: "TestOS".into(),
                    version: VersionInfo::default(),
                },
                device: None,
            })
        }
    }

    fn calls(cache: &ResultCache<Counting>) -> usize {
        cache.classifier().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn hit_skips_classification() {
        let cache = ResultCache::new(Counting::default(), 4);
        let first = cache.lookup("ua").unwrap();
        let second = cache.lookup("ua").unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls(&cache), 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.len), (1, 1, 1));
    }

    #[test]
    fn keys_are_exact() {
        let cache = ResultCache::new(Counting::default(), 4);
        cache.lookup("UA").unwrap();
        cache.lookup("ua").unwrap();
        cache.lookup(" ua").unwrap();
        assert_eq!(calls(&cache), 3);
    }

    #[test]
    fn evicted_key_is_classified_again() {
        let cache = ResultCache::new(Counting::default(), 2);
        cache.lookup("a").unwrap();
        cache.lookup("b").unwrap();
        cache.lookup("c").unwrap();
        assert!(!cache.contains("a"));
        assert_eq!(calls(&cache), 3);
        cache.lookup("a").unwrap();
        assert_eq!(calls(&cache), 4);
    }

    #[test]
    fn hit_refreshes_recency() {
        let cache = ResultCache::new(Counting::default(), 2);
        cache.lookup("a").unwrap();
        cache.lookup("b").unwrap();
        cache.lookup("a").unwrap();
        cache.lookup("c").unwrap();
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn contains_does_not_refresh_recency() {
        let cache = ResultCache::new(Counting::default(), 2);
        cache.lookup("a").unwrap();
        cache.lookup("b").unwrap();
        assert!(cache.contains("a"));
        cache.lookup("c").unwrap();
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn clear_drops_entries_but_keeps_capacity() {
        let cache = ResultCache::new(Counting::default(), 3);
        cache.lookup("a").unwrap();
        cache.lookup("b").unwrap();
        cache.clear();
        let stats = cache.stats();
        assert_eq!((stats.len, stats.capacity), (0, 3));
        cache.lookup("a").unwrap();
        assert_eq!(calls(&cache), 3);
    }

    #[test]
    fn zero_capacity_holds_one_entry() {
        let cache = ResultCache::new(Counting::default(), 0);
        cache.lookup("a").unwrap();
        cache.lookup("b").unwrap();
        assert_eq!(cache.stats().capacity, 1);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = ResultCache::new(Counting::default(), 2);
        assert!(cache.lookup("boom").is_err());
        assert!(cache.lookup("boom").is_err());
        assert_eq!(calls(&cache), 2);
        assert_eq!(cache.stats().len, 0);
    }

    #[test]
    fn owned_copy_is_independent() {
        let cache = ResultCache::new(Counting::default(), 2);
        let mut copy = cache.lookup_owned("ua").unwrap();
        copy.name.push_str("-mutated");
        copy.version.major = None;
        let again = cache.lookup("ua").unwrap();
        assert_eq!(again.name, "ua");
        assert_eq!(again.version.major.as_deref(), Some("1"));
    }

    #[test]
    fn concurrent_lookups_share_entries() {
        let cache = ResultCache::new(Counting::default(), 8);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for i in 0..100 {
                        let key = format!("ua-{}", i % 4);
                        assert_eq!(cache.lookup(&key).unwrap().name, key);
                    }
                });
            }
        });
        let stats = cache.stats();
        assert_eq!(stats.len, 4);
        assert_eq!(stats.hits + stats.misses, 800);
        // Racing misses may duplicate work, but never beyond one per thread per key.
        assert!(calls(&cache) >= 4 && calls(&cache) <= 32);
    }
}
