//! Reusable pixel-buffer pool keyed by `(width, height)`.
//!
//! Scratch buffers for individual parts are borrowed with [`BufferPool::get`]
//! and handed back with [`BufferPool::put`]. Each size has its own bucket;
//! a bucket retains at most `max_per_bucket` buffers and drops the rest.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::types::PixelBuffer;

/// Buffers retained per bucket when no limit is configured.
pub const DEFAULT_MAX_PER_BUCKET: usize = 16;

/// Pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Distinct `(width, height)` buckets.
    pub buckets: usize,
    /// Buffers currently held across all buckets.
    pub retained: usize,
    /// Buffers created because their bucket was empty.
    pub allocations: u64,
    /// Buffers handed out from a bucket.
    pub reuses: u64,
    /// Buffers discarded on `put`.
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct PoolInner {
    buckets: HashMap<(u32, u32), Vec<PixelBuffer>>,
    stats: PoolStats,
}

/// Thread-safe buffer pool.
#[derive(Debug)]
pub struct BufferPool {
    max_per_bucket: usize,
    inner: RwLock<PoolInner>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_BUCKET)
    }
}

impl BufferPool {
    /// A pool keeping up to `max_per_bucket` buffers per size. Zero disables retention.
    pub fn new(max_per_bucket: usize) -> Self {
        Self {
            max_per_bucket,
            inner: RwLock::new(PoolInner::default()),
        }
    }

    pub fn max_per_bucket(&self) -> usize {
        self.max_per_bucket
    }

    /// Borrow a fully transparent `width`x`height` buffer.
    pub fn get(&self, width: u32, height: u32) -> PixelBuffer {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let recycled = inner.buckets.get_mut(&(width, height)).and_then(Vec::pop);
        match recycled {
            Some(mut buffer) => {
                buffer.clear();
                inner.stats.reuses += 1;
                inner.stats.retained = inner.stats.retained.saturating_sub(1);
                buffer
            }
            None => {
                inner.stats.allocations += 1;
                PixelBuffer::new(width, height)
            }
        }
    }

    /// Return a buffer to its size's bucket.
    ///
    /// Empty buffers, buffers whose storage disagrees with their size, and
    /// buffers beyond the bucket limit are dropped.
    pub fn put(&self, buffer: PixelBuffer) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if buffer.is_empty() || !buffer.is_consistent() || self.max_per_bucket == 0 {
            inner.stats.dropped += 1;
            return;
        }
        let bucket = inner.buckets.entry(buffer.size()).or_default();
        if bucket.len() >= self.max_per_bucket {
            inner.stats.dropped += 1;
            return;
        }
        bucket.push(buffer);
        inner.stats.retained += 1;
    }

    /// Drop every bucket. Counters other than `retained` and `buckets` are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.buckets.clear();
        inner.stats.retained = 0;
    }

    /// Buffers currently retained for `width`x`height`.
    pub fn retained(&self, width: u32, height: u32) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.buckets.get(&(width, height)).map_or(0, Vec::len)
    }

    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        PoolStats {
            buckets: inner.buckets.len(),
            ..inner.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use std::sync::Arc;

    #[test]
    fn test_get_returns_cleared_buffer() {
        let pool = BufferPool::new(4);
        let mut buffer = pool.get(4, 4);
        buffer.set(1, 1, Colour::WHITE);
        pool.put(buffer);

        let again = pool.get(4, 4);
        assert_eq!(again.size(), (4, 4));
        assert_eq!(again.opaque_pixel_count(), 0);

        let stats = pool.stats();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.reuses, 1);
    }

    #[test]
    fn test_buckets_are_per_size() {
        let pool = BufferPool::new(4);
        pool.put(PixelBuffer::new(8, 8));
        pool.put(PixelBuffer::new(4, 2));

        assert_eq!(pool.retained(8, 8), 1);
        assert_eq!(pool.retained(4, 2), 1);
        assert_eq!(pool.get(2, 4).size(), (2, 4));
        assert_eq!(pool.retained(4, 2), 1);
        assert_eq!(pool.stats().buckets, 2);
    }

    #[test]
    fn test_misses_do_not_create_buckets() {
        let pool = BufferPool::new(4);
        for size in 1..=16 {
            pool.get(size, size);
        }
        let stats = pool.stats();
        assert_eq!((stats.buckets, stats.allocations), (0, 16));

        pool.put(PixelBuffer::new(3, 3));
        assert_eq!(pool.stats().buckets, 1);
    }

    #[test]
    fn test_put_honors_bucket_cap() {
        let pool = BufferPool::new(1);
        let a = pool.get(8, 8);
        let b = pool.get(8, 8);
        pool.put(a);
        pool.put(b);

        let stats = pool.stats();
        assert_eq!(stats.retained, 1);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_put_discards_unusable_buffers() {
        let pool = BufferPool::new(4);
        pool.put(PixelBuffer::new(0, 5));
        assert_eq!(pool.stats().retained, 0);
        assert_eq!(pool.stats().dropped, 1);

        let disabled = BufferPool::new(0);
        disabled.put(PixelBuffer::new(2, 2));
        assert_eq!(disabled.retained(2, 2), 0);
    }

    #[test]
    fn test_clear_drops_buckets() {
        let pool = BufferPool::default();
        pool.put(PixelBuffer::new(3, 3));
        pool.clear();
        assert_eq!(pool.retained(3, 3), 0);
        assert_eq!(pool.stats().buckets, 0);
        assert_eq!(pool.stats().retained, 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let pool = Arc::new(BufferPool::new(8));
        std::thread::scope(|s| {
            for _ in 0..4 {
                let pool = Arc::clone(&pool);
                s.spawn(move || {
                    for _ in 0..50 {
                        let buffer = pool.get(6, 6);
                        pool.put(buffer);
                    }
                });
            }
        });
        let stats = pool.stats();
        assert_eq!(stats.allocations + stats.reuses, 200);
        assert!(stats.retained <= 8);
    }
}
