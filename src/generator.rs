//! Cached sprite generation.

use std::sync::Arc;

use tracing::debug;

use crate::batch::{BatchCoordinator, BatchOptions, SpriteSource};
use crate::cache::{CacheKey, SpriteCache};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::pool::BufferPool;
use crate::render::{CompositeEngine, CompositionEngine};
use crate::types::{CompositeRequest, PixelBuffer, SpriteRequest};

/// Ties a cache and a buffer pool to the composition engines.
///
/// The cache and pool are passed in explicitly so callers decide their
/// lifetime, e.g. one per scene, cleared on transitions.
pub struct SpriteGenerator {
    cache: Arc<SpriteCache>,
    pool: Arc<BufferPool>,
    engine: CompositeEngine,
    batch: BatchOptions,
}

impl Default for SpriteGenerator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SpriteGenerator {
    /// A generator over shared `cache` and `pool` with the builtin rasterizer and palettes.
    pub fn new(cache: Arc<SpriteCache>, pool: Arc<BufferPool>) -> Self {
        let engine = CompositionEngine::new().with_pool(Arc::clone(&pool));
        Self {
            cache,
            pool,
            engine: CompositeEngine::new(engine),
            batch: BatchOptions::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let cache = Arc::new(SpriteCache::new(config.cache.capacity));
        let pool = Arc::new(BufferPool::new(config.pool.max_per_bucket));
        let engine = CompositionEngine::new()
            .with_pool(Arc::clone(&pool))
            .with_smoothing(config.render.smoothing());
        Self {
            cache,
            pool,
            engine: CompositeEngine::new(engine),
            batch: config.batch,
        }
    }

    /// Replace the engine, e.g. to plug in another rasterizer or palette source.
    ///
    /// The engine should share this generator's pool if it pools at all.
    pub fn with_engine(mut self, engine: CompositionEngine) -> Self {
        self.engine = CompositeEngine::new(engine);
        self
    }

    pub fn with_batch_options(mut self, options: BatchOptions) -> Self {
        self.batch = options;
        self
    }

    pub fn cache(&self) -> &Arc<SpriteCache> {
        &self.cache
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    pub fn engine(&self) -> &CompositionEngine {
        self.engine.engine()
    }

    /// Cached sprite for `request`, generating and storing it on a miss.
    pub fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
        let key = CacheKey::from_request(request);
        if let Some(buffer) = self.cache.get_key(&key) {
            return Ok(buffer);
        }
        let buffer = Arc::new(self.engine.engine().generate(request)?);
        self.cache.put_key(key, Arc::clone(&buffer));
        Ok(buffer)
    }

    /// Cached composite sprite for `request`.
    pub fn generate_composite(&self, request: &CompositeRequest) -> Result<Arc<PixelBuffer>> {
        let key = CacheKey::from_composite(request);
        if let Some(buffer) = self.cache.get_key(&key) {
            return Ok(buffer);
        }
        let buffer = Arc::new(self.engine.generate_composite(request)?);
        self.cache.put_key(key, Arc::clone(&buffer));
        Ok(buffer)
    }

    /// Batch coordinator over this generator, using the configured batch options.
    pub fn batch(&self) -> BatchCoordinator<&Self> {
        BatchCoordinator::new(self).with_options(self.batch)
    }

    /// Populate the cache for `requests` ahead of need.
    pub fn prewarm(&self, requests: &[SpriteRequest]) {
        self.batch().prewarm(requests);
        debug!(requests = requests.len(), cached = self.cache.len(), "prewarm finished");
    }
}

impl SpriteSource for SpriteGenerator {
    fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
        SpriteGenerator::generate(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LayerConfig, LayerKind, ShapeKind};

    #[test]
    fn test_second_generate_hits_cache() {
        let generator = SpriteGenerator::default();
        let request = SpriteRequest::entity(16, 16, 5).with_entity_type("knight");

        let a = generator.generate(&request).unwrap();
        let b = generator.generate(&request).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let stats = generator.cache().stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let generator = SpriteGenerator::default();
        let request = SpriteRequest::entity(16, 16, 5).with_genre("vaporwave");
        assert!(generator.generate(&request).is_err());
        assert!(generator.cache().is_empty());
    }

    #[test]
    fn test_composite_cached_separately() {
        let generator = SpriteGenerator::default();
        let base = SpriteRequest::entity(16, 16, 5);
        let composite = CompositeRequest::new(base.clone())
            .with_layer(LayerConfig::new(LayerKind::Body, ShapeKind::Ellipse));

        generator.generate(&base).unwrap();
        generator.generate_composite(&composite).unwrap();
        assert_eq!(generator.cache().len(), 2);
        assert!(generator.generate_composite(&CompositeRequest::new(base)).is_err());
    }

    #[test]
    fn test_shared_cache_between_generators() {
        let cache = Arc::new(SpriteCache::new(10));
        let pool = Arc::new(BufferPool::default());
        let first = SpriteGenerator::new(Arc::clone(&cache), Arc::clone(&pool));
        let second = SpriteGenerator::new(Arc::clone(&cache), pool);

        let request = SpriteRequest::entity(12, 12, 9);
        let a = first.generate(&request).unwrap();
        let b = second.generate(&request).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig::from_yaml_str("cache:\n  capacity: 3\npool:\n  max_per_bucket: 2\n").unwrap();
        let generator = SpriteGenerator::from_config(&config);
        assert_eq!(generator.cache().capacity(), 3);
        assert_eq!(generator.pool().max_per_bucket(), 2);
    }

    #[test]
    fn test_prewarm_fills_cache() {
        let generator = SpriteGenerator::default().with_batch_options(BatchOptions::concurrent(3));
        let requests: Vec<_> = (0..6).map(|s| SpriteRequest::entity(10, 10, s)).collect();
        generator.prewarm(&requests);
        assert_eq!(generator.cache().len(), 6);
        assert!(requests.iter().all(|r| generator.cache().contains(r)));
    }
}
