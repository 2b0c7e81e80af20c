//! Thread-safe LRU sprite cache.
//!
//! Lookups take the read lock: recency is an atomic tick stored in each
//! entry and hit/miss counters are atomics, so concurrent `get`s never
//! contend. Inserts, eviction, capacity changes and `clear` take the write
//! lock.

mod key;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::types::{PixelBuffer, SpriteRequest};

pub use key::CacheKey;

/// Capacity used when a cache is built with capacity zero.
pub const DEFAULT_CAPACITY: usize = 100;

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Entries currently stored.
    pub size: usize,
    pub capacity: usize,
    /// `hits / (hits + misses)`, 0 before any lookup.
    pub hit_rate: f64,
}

struct Entry {
    buffer: Arc<PixelBuffer>,
    last_used: AtomicU64,
}

/// LRU store of generated sprites keyed by [`CacheKey`].
pub struct SpriteCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
    capacity: AtomicU64,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for SpriteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SpriteCache {
    /// A cache holding up to `capacity` sprites; zero means [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity.min(1024))),
            capacity: AtomicU64::new(capacity as u64),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed) as usize
    }

    /// Cached sprite for `request`, marking it most recently used.
    pub fn get(&self, request: &SpriteRequest) -> Option<Arc<PixelBuffer>> {
        self.get_key(&CacheKey::from_request(request))
    }

    pub fn get_key(&self, key: &CacheKey) -> Option<Arc<PixelBuffer>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) => {
                entry.last_used.store(self.tick(), Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "cache hit");
                Some(Arc::clone(&entry.buffer))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "cache miss");
                None
            }
        }
    }

    /// Store a sprite for `request`, evicting the least recently used entry when full.
    pub fn put(&self, request: &SpriteRequest, buffer: impl Into<Arc<PixelBuffer>>) {
        self.put_key(CacheKey::from_request(request), buffer);
    }

    pub fn put_key(&self, key: CacheKey, buffer: impl Into<Arc<PixelBuffer>>) {
        let buffer = buffer.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let now = self.tick();

        if let Some(entry) = entries.get_mut(&key) {
            entry.buffer = buffer;
            entry.last_used.store(now, Ordering::Relaxed);
            return;
        }

        if entries.len() >= self.capacity() {
            self.evict_one(&mut entries);
        }
        entries.insert(
            key,
            Entry {
                buffer,
                last_used: AtomicU64::new(now),
            },
        );
    }

    fn evict_one(&self, entries: &mut HashMap<CacheKey, Entry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
            .map(|(key, _)| *key);

        if let Some(key) = oldest {
            entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "cache eviction");
        }
    }

    /// Change the capacity and evict down to it. Zero is ignored.
    pub fn set_capacity(&self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        self.capacity.store(capacity as u64, Ordering::Relaxed);
        while entries.len() > capacity {
            self.evict_one(&mut entries);
        }
        debug!(capacity, size = entries.len(), "cache capacity changed");
    }

    pub fn contains(&self, request: &SpriteRequest) -> bool {
        self.contains_key(&CacheKey::from_request(request))
    }

    /// Presence check that does not touch recency or counters.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            size,
            capacity: self.capacity(),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Remove every entry and reset counters. Capacity is kept.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.clock.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(seed: i64) -> SpriteRequest {
        SpriteRequest::entity(8, 8, seed)
    }

    fn buf() -> PixelBuffer {
        PixelBuffer::new(8, 8)
    }

    #[test]
    fn test_zero_capacity_defaults() {
        assert_eq!(SpriteCache::new(0).capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_capacity_two_evicts_first() {
        let cache = SpriteCache::new(2);
        let (a, b, c) = (req(1), req(2), req(3));
        cache.put(&a, buf());
        cache.put(&b, buf());
        cache.put(&c, buf());

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&a));
        assert!(cache.contains(&b));
        assert!(cache.contains(&c));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_get_protects_from_eviction() {
        let cache = SpriteCache::new(2);
        let (a, b, c) = (req(1), req(2), req(3));
        cache.put(&a, buf());
        cache.put(&b, buf());
        assert!(cache.get(&a).is_some());
        cache.put(&c, buf());

        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
    }

    #[test]
    fn test_put_existing_refreshes_without_eviction() {
        let cache = SpriteCache::new(2);
        cache.put(&req(1), buf());
        cache.put(&req(2), buf());
        cache.put(&req(1), PixelBuffer::new(2, 2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&req(1)).unwrap().size(), (2, 2));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_hit_rate() {
        let cache = SpriteCache::new(4);
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.put(&req(1), buf());
        for _ in 0..3 {
            cache.get(&req(1));
        }
        cache.get(&req(2));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (3, 1));
        assert_eq!(stats.hit_rate, 0.75);
    }

    #[test]
    fn test_set_capacity_evicts_down() {
        let cache = SpriteCache::new(5);
        for seed in 0..5 {
            cache.put(&req(seed), buf());
        }
        cache.get(&req(0));
        cache.set_capacity(2);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&req(0)));
        assert!(cache.contains(&req(4)));

        cache.set_capacity(0);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_clear_resets_counters_keeps_capacity() {
        let cache = SpriteCache::new(3);
        cache.put(&req(1), buf());
        cache.get(&req(1));
        cache.get(&req(9));
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!((stats.hits, stats.misses, stats.evictions), (0, 0, 0));
        assert_eq!(stats.capacity, 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(SpriteCache::new(16));
        std::thread::scope(|s| {
            for t in 0..4_i64 {
                let cache = Arc::clone(&cache);
                s.spawn(move || {
                    for i in 0..100_i64 {
                        let r = req(t * 1000 + i % 20);
                        if cache.get(&r).is_none() {
                            cache.put(&r, buf());
                        }
                    }
                });
            }
        });
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 400);
        assert!(stats.size <= 16);
    }
}
