//! Time-bounded cache of directory listings.
//!
//! Entries are never evicted proactively: every read first purges whatever has
//! outlived the TTL. `clear` installs a fresh backing map instead of wiping the old
//! one, so a caller still holding the previous generation keeps a consistent view.

use crate::config::DEFAULT_CACHE_TTL_SECS;
use dashmap::DashMap;
use locus_api::{Clock, SystemClock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Shared, immutable listing.
pub type Listing = Arc<[String]>;

#[derive(Debug, Clone)]
struct ListingEntry {
    listing: Listing,
    created: Instant,
}

type Store = Arc<DashMap<String, ListingEntry>>;

pub struct ListingCache {
    enabled: AtomicBool,
    ttl_nanos: AtomicU64,
    store: RwLock<Store>,
    clock: Arc<dyn Clock>,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ListingCache {
    /// A disabled cache with the default one-hour TTL.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            ttl_nanos: AtomicU64::new(secs_to_nanos(DEFAULT_CACHE_TTL_SECS)),
            store: RwLock::new(Arc::new(DashMap::new())),
            clock,
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Set the entry lifetime. Negative or NaN values mean zero.
    pub fn set_ttl_secs(&self, secs: f64) {
        self.ttl_nanos.store(secs_to_nanos(secs), Ordering::Release);
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_nanos(self.ttl_nanos.load(Ordering::Acquire))
    }

    /// The fresh listing stored under `key`, after purging stale entries.
    pub fn get(&self, key: &str) -> Option<Listing> {
        if !self.is_enabled() {
            return None;
        }
        let store = self.current();
        let now = self.clock.now();
        let ttl = self.ttl();
        store.retain(|_, entry| is_fresh(entry, now, ttl));
        let hit = store
            .get(key)
            .filter(|entry| is_fresh(entry, now, ttl))
            .map(|entry| entry.listing.clone());
        hit
    }

    /// Store `listing` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, listing: impl Into<Listing>) {
        if !self.is_enabled() {
            return;
        }
        let entry = ListingEntry {
            listing: listing.into(),
            created: self.clock.now(),
        };
        self.current().insert(key.into(), entry);
    }

    /// Remove every entry that has outlived the TTL.
    pub fn purge_stale(&self) {
        let now = self.clock.now();
        let ttl = self.ttl();
        let store = self.current();
        let before = store.len();
        store.retain(|_, entry| is_fresh(entry, now, ttl));
        let purged = before.saturating_sub(store.len());
        if purged > 0 {
            tracing::trace!(purged, "purged stale listings");
        }
    }

    /// Replace the backing store with an empty one.
    pub fn clear(&self) {
        let fresh: Store = Arc::new(DashMap::new());
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    /// Restore the default TTL and clear. The enable switch is left as is.
    pub fn reset(&self) {
        self.set_ttl_secs(DEFAULT_CACHE_TTL_SECS);
        self.clear();
    }

    /// Number of entries held, stale ones included.
    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self) -> Store {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("enabled", &self.is_enabled())
            .field("ttl", &self.ttl())
            .field("entries", &self.len())
            .finish()
    }
}

fn is_fresh(entry: &ListingEntry, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(entry.created) < ttl
}

fn secs_to_nanos(secs: f64) -> u64 {
    if secs.is_nan() || secs <= 0.0 {
        return 0;
    }
    let nanos = secs * 1_000_000_000.0;
    if nanos >= u64::MAX as f64 {
        u64::MAX
    } else {
        nanos as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            })
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }

    fn enabled_cache(clock: Arc<ManualClock>) -> ListingCache {
        let cache = ListingCache::new(clock);
        cache.set_enabled(true);
        cache
    }

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_disabled_cache_drops_writes() {
        let cache = ListingCache::new(ManualClock::new());
        cache.put("/data", listing(&["a.tif"]));
        assert!(cache.get("/data").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_entry_hits() {
        let clock = ManualClock::new();
        let cache = enabled_cache(clock.clone());
        cache.set_ttl_secs(100.0);
        cache.put("/data", listing(&["a.tif", "b.tif"]));

        clock.advance(Duration::from_secs(99));
        let hit = cache.get("/data").unwrap();
        assert_eq!(&*hit, &["a.tif".to_string(), "b.tif".to_string()]);
    }

    #[test]
    fn test_expired_entry_misses_and_is_purged() {
        let clock = ManualClock::new();
        let cache = enabled_cache(clock.clone());
        cache.set_ttl_secs(0.01);
        cache.put("/data", listing(&["a.tif"]));
        cache.put("/other", listing(&["b.tif"]));

        clock.advance(Duration::from_millis(20));
        assert!(cache.get("/data").is_none());
        // the read purged every stale entry, not just the requested one
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_stale_keeps_fresh_entries() {
        let clock = ManualClock::new();
        let cache = enabled_cache(clock.clone());
        cache.set_ttl_secs(10.0);
        cache.put("/old", listing(&["a"]));
        clock.advance(Duration::from_secs(8));
        cache.put("/new", listing(&["b"]));
        clock.advance(Duration::from_secs(3));

        cache.purge_stale();
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/new").is_some());
    }

    #[test]
    fn test_ttl_change_applies_to_existing_entries() {
        let clock = ManualClock::new();
        let cache = enabled_cache(clock.clone());
        cache.put("/data", listing(&["a"]));
        clock.advance(Duration::from_secs(5));

        cache.set_ttl_secs(1.0);
        assert!(cache.get("/data").is_none());
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let clock = ManualClock::new();
        let cache = enabled_cache(clock.clone());
        cache.set_ttl_secs(10.0);
        cache.put("/data", listing(&["a"]));
        clock.advance(Duration::from_secs(9));
        cache.put("/data", listing(&["a", "b"]));
        clock.advance(Duration::from_secs(9));

        assert_eq!(cache.get("/data").unwrap().len(), 2);
    }

    #[test]
    fn test_clear_swaps_generation() {
        let cache = enabled_cache(ManualClock::new());
        cache.put("/data", listing(&["a"]));

        let old = cache.current();
        cache.clear();

        assert!(cache.get("/data").is_none());
        assert!(old.contains_key("/data"));

        cache.put("/data", listing(&["b"]));
        assert_eq!(old.get("/data").unwrap().listing[0], "a");
    }

    #[test]
    fn test_reset_restores_default_ttl() {
        let cache = enabled_cache(ManualClock::new());
        cache.set_ttl_secs(1.0);
        cache.put("/data", listing(&["a"]));

        cache.reset();
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
        assert!(cache.is_empty());
        assert!(cache.is_enabled());
    }

    #[test]
    fn test_ttl_conversion_edges() {
        let cache = ListingCache::default();
        cache.set_ttl_secs(-5.0);
        assert_eq!(cache.ttl(), Duration::ZERO);
        cache.set_ttl_secs(f64::NAN);
        assert_eq!(cache.ttl(), Duration::ZERO);
        cache.set_ttl_secs(f64::INFINITY);
        assert_eq!(cache.ttl(), Duration::from_nanos(u64::MAX));
        cache.set_ttl_secs(0.25);
        assert_eq!(cache.ttl(), Duration::from_millis(250));
    }

    #[test]
    fn test_concurrent_put_get() {
        let cache = Arc::new(enabled_cache(ManualClock::new()));
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("/dir/{i}/{j}");
                        cache.put(key.clone(), vec![key.clone()]);
                        assert_eq!(cache.get(&key).unwrap()[0], key);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
