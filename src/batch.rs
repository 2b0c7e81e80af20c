//! Batch generation over many requests, sequentially or on a bounded rayon pool.
//!
//! Outputs always line up with the input order. A failed item leaves `None`
//! in its slot and is reported through the error callback; the rest of the
//! batch still runs. Batches cannot be cancelled once started.

use std::sync::mpsc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SpriteError};
use crate::render::CompositionEngine;
use crate::types::{PixelBuffer, SpriteRequest};

/// Worker count used when none is configured.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Anything that turns one request into a sprite.
pub trait SpriteSource: Sync {
    fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>>;
}

impl<T: SpriteSource + ?Sized> SpriteSource for &T {
    fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
        (**self).generate(request)
    }
}

impl<T: SpriteSource + Send + ?Sized> SpriteSource for Arc<T> {
    fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
        (**self).generate(request)
    }
}

impl SpriteSource for CompositionEngine {
    fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
        CompositionEngine::generate(self, request).map(Arc::new)
    }
}

/// How a batch is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BatchOptions {
    pub concurrent: bool,
    /// Worker threads; 0 means [`DEFAULT_MAX_WORKERS`].
    pub max_workers: usize,
    /// Bounded work-queue depth; 0 means twice the worker count.
    pub queue_depth: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrent: false,
            max_workers: DEFAULT_MAX_WORKERS,
            queue_depth: 0,
        }
    }
}

impl BatchOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn concurrent(max_workers: usize) -> Self {
        Self {
            concurrent: true,
            max_workers,
            ..Self::default()
        }
    }

    pub fn workers(&self) -> usize {
        if self.max_workers == 0 {
            DEFAULT_MAX_WORKERS
        } else {
            self.max_workers
        }
    }

    pub fn depth(&self) -> usize {
        if self.queue_depth == 0 {
            self.workers() * 2
        } else {
            self.queue_depth
        }
    }

    /// Sequential unless concurrency is requested with more than one worker.
    fn runs_concurrently(&self) -> bool {
        self.concurrent && self.max_workers != 1
    }
}

/// Fans requests out over a [`SpriteSource`].
pub struct BatchCoordinator<S> {
    source: S,
    options: BatchOptions,
}

impl<S: SpriteSource> BatchCoordinator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: BatchOptions::default(),
        }
    }

    /// Options used by [`prewarm`](Self::prewarm).
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Generate every request, returning outputs in input order.
    ///
    /// `on_progress(completed, total)` fires after each success and
    /// `on_error(index, err)` after each failure. Both run on the calling
    /// thread.
    #[tracing::instrument(
        skip_all,
        fields(total = requests.len(), concurrent = options.concurrent)
    )]
    pub fn batch_generate<P, E>(
        &self,
        requests: &[SpriteRequest],
        options: &BatchOptions,
        mut on_progress: P,
        mut on_error: E,
    ) -> Vec<Option<Arc<PixelBuffer>>>
    where
        P: FnMut(usize, usize),
        E: FnMut(usize, &SpriteError),
    {
        let total = requests.len();
        let mut outputs: Vec<Option<Arc<PixelBuffer>>> = vec![None; total];
        if total == 0 {
            return outputs;
        }

        let mut completed = 0;
        let mut failed = 0;
        let mut record = |index: usize, result: Result<Arc<PixelBuffer>>| match result {
            Ok(buffer) => {
                outputs[index] = Some(buffer);
                completed += 1;
                on_progress(completed, total);
            }
            Err(err) => {
                failed += 1;
                warn!(index, error = %err, "batch item failed");
                on_error(index, &err);
            }
        };

        if options.runs_concurrently() {
            let workers = options.workers().min(total);
            debug!(total, workers, depth = options.depth(), "batch start");
            self.run_concurrent(requests, workers, options.depth(), &mut record);
        } else {
            debug!(total, "batch start");
            for (index, request) in requests.iter().enumerate() {
                record(index, self.source.generate(request));
            }
        }

        debug!(total, completed, failed, "batch finished");
        outputs
    }

    /// Run on a dedicated pool of `workers` threads with at most `depth`
    /// requests in flight. Results are recorded on the calling thread as
    /// they complete.
    fn run_concurrent(
        &self,
        requests: &[SpriteRequest],
        workers: usize,
        depth: usize,
        record: &mut dyn FnMut(usize, Result<Arc<PixelBuffer>>),
    ) {
        let pool = match build_thread_pool(workers) {
            Ok(pool) => pool,
            Err(err) => {
                warn!(error = %err, "worker pool unavailable, running sequentially");
                for (index, request) in requests.iter().enumerate() {
                    record(index, self.source.generate(request));
                }
                return;
            }
        };

        let source = &self.source;
        for (chunk_index, chunk) in requests.chunks(depth).enumerate() {
            let offset = chunk_index * depth;
            pool.in_place_scope(|s| {
                let (result_tx, result_rx) = mpsc::channel();
                for (i, request) in chunk.iter().enumerate() {
                    let result_tx = result_tx.clone();
                    s.spawn(move |_| {
                        let _ = result_tx.send((offset + i, source.generate(request)));
                    });
                }
                drop(result_tx);

                for (index, result) in result_rx {
                    record(index, result);
                }
            });
        }
    }

    /// Options [`prewarm`](Self::prewarm) runs with: always concurrent, and
    /// a single configured worker is raised to [`DEFAULT_MAX_WORKERS`].
    pub fn prewarm_options(&self) -> BatchOptions {
        let max_workers = match self.options.max_workers {
            1 => DEFAULT_MAX_WORKERS,
            n => n,
        };
        BatchOptions {
            concurrent: true,
            max_workers,
            ..self.options
        }
    }

    /// Generate `requests` concurrently with callbacks discarded, to warm a cache.
    pub fn prewarm(&self, requests: &[SpriteRequest]) {
        let options = self.prewarm_options();
        self.batch_generate(requests, &options, |_, _| {}, |_, _| {});
    }
}

fn build_thread_pool(
    workers: usize,
) -> std::result::Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sprite-batch-{i}"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Encodes the request seed into the buffer width; odd seeds above 100 fail.
    struct SeedEcho {
        calls: AtomicUsize,
    }

    impl SeedEcho {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SpriteSource for SeedEcho {
        fn generate(&self, request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Invert completion order for concurrent runs.
            std::thread::sleep(Duration::from_millis(20u64.saturating_sub(request.seed as u64 * 4)));
            if request.seed > 100 && request.seed % 2 == 1 {
                return Err(SpriteError::InvalidRequest {
                    message: format!("seed {} rejected", request.seed),
                    help: None,
                });
            }
            Ok(Arc::new(PixelBuffer::new(request.seed as u32 + 1, 1)))
        }
    }

    fn requests(seeds: &[i64]) -> Vec<SpriteRequest> {
        seeds.iter().map(|&s| SpriteRequest::entity(4, 4, s)).collect()
    }

    fn widths(outputs: &[Option<Arc<PixelBuffer>>]) -> Vec<Option<u32>> {
        outputs.iter().map(|o| o.as_ref().map(|b| b.width())).collect()
    }

    #[test]
    fn test_empty_batch() {
        let coordinator = BatchCoordinator::new(SeedEcho::new());
        let mut progress = 0;
        let out = coordinator.batch_generate(&[], &BatchOptions::concurrent(4), |_, _| progress += 1, |_, _| {});
        assert!(out.is_empty());
        assert_eq!(progress, 0);
    }

    #[test]
    fn test_order_preserved_for_every_setting() {
        let reqs = requests(&[0, 1, 2, 3, 4]);
        let expected: Vec<Option<u32>> = (1..=5).map(Some).collect();
        let coordinator = BatchCoordinator::new(SeedEcho::new());

        for options in [
            BatchOptions::sequential(),
            BatchOptions::concurrent(0),
            BatchOptions::concurrent(1),
            BatchOptions::concurrent(3),
            BatchOptions { concurrent: true, max_workers: 3, queue_depth: 1 },
            BatchOptions::concurrent(16),
        ] {
            let out = coordinator.batch_generate(&reqs, &options, |_, _| {}, |_, _| {});
            assert_eq!(widths(&out), expected, "{:?}", options);
        }
    }

    #[test]
    fn test_errors_reported_and_batch_continues() {
        let reqs = requests(&[1, 101, 2, 103, 3]);
        let coordinator = BatchCoordinator::new(SeedEcho::new());

        for options in [BatchOptions::sequential(), BatchOptions::concurrent(3)] {
            let mut failed = Vec::new();
            let mut progress = Vec::new();
            let out = coordinator.batch_generate(
                &reqs,
                &options,
                |done, total| progress.push((done, total)),
                |index, err| {
                    assert!(err.is_fatal());
                    failed.push(index);
                },
            );
            failed.sort_unstable();

            assert_eq!(widths(&out), vec![Some(2), None, Some(3), None, Some(4)]);
            assert_eq!(failed, vec![1, 3]);
            assert_eq!(progress, vec![(1, 5), (2, 5), (3, 5)]);
        }
    }

    #[test]
    fn test_prewarm_generates_everything() {
        let source = SeedEcho::new();
        let coordinator = BatchCoordinator::new(&source).with_options(BatchOptions::concurrent(2));
        coordinator.prewarm(&requests(&[0, 1, 2, 101]));
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_prewarm_with_one_worker_still_runs_concurrently() {
        let coordinator =
            BatchCoordinator::new(SeedEcho::new()).with_options(BatchOptions::concurrent(1));
        let options = coordinator.prewarm_options();
        assert!(options.runs_concurrently());
        assert_eq!(options.workers(), DEFAULT_MAX_WORKERS);

        let sequential =
            BatchCoordinator::new(SeedEcho::new()).with_options(BatchOptions::sequential());
        assert_eq!(sequential.prewarm_options(), BatchOptions::concurrent(DEFAULT_MAX_WORKERS));

        let wide = BatchOptions { concurrent: false, max_workers: 6, queue_depth: 3 };
        let coordinator = BatchCoordinator::new(SeedEcho::new()).with_options(wide);
        assert_eq!(coordinator.prewarm_options(), BatchOptions { concurrent: true, ..wide });
    }

    #[test]
    fn test_concurrent_batch_runs_off_the_calling_thread() {
        struct ThreadNames(std::sync::Mutex<Vec<String>>);

        impl SpriteSource for ThreadNames {
            fn generate(&self, _request: &SpriteRequest) -> Result<Arc<PixelBuffer>> {
                let name = std::thread::current().name().unwrap_or_default().to_string();
                self.0.lock().unwrap().push(name);
                Ok(Arc::new(PixelBuffer::new(1, 1)))
            }
        }

        let source = ThreadNames(std::sync::Mutex::new(Vec::new()));
        let coordinator = BatchCoordinator::new(&source);
        let out = coordinator.batch_generate(
            &requests(&[0, 1, 2, 3, 4, 5, 6]),
            &BatchOptions { concurrent: true, max_workers: 2, queue_depth: 3 },
            |_, _| {},
            |_, _| {},
        );
        assert!(out.iter().all(Option::is_some));

        let names = source.0.lock().unwrap();
        assert_eq!(names.len(), 7);
        assert!(names.iter().all(|n| n.starts_with("sprite-batch-")), "{names:?}");
    }

    #[test]
    fn test_options_defaults() {
        let options = BatchOptions::default();
        assert!(!options.concurrent);
        assert_eq!(options.workers(), 4);
        assert_eq!(options.depth(), 8);
        assert_eq!(BatchOptions::concurrent(0).workers(), DEFAULT_MAX_WORKERS);
        assert!(!BatchOptions::concurrent(1).runs_concurrently());
    }

    #[test]
    fn test_engine_as_source() {
        let coordinator = BatchCoordinator::new(CompositionEngine::new());
        let reqs = vec![
            SpriteRequest::entity(12, 12, 1),
            SpriteRequest::entity(0, 12, 2),
            SpriteRequest::entity(12, 12, 3).with_entity_type("slime"),
        ];
        let mut errors = 0;
        let out = coordinator.batch_generate(&reqs, &BatchOptions::concurrent(2), |_, _| {}, |_, _| errors += 1);
        assert_eq!(errors, 1);
        assert!(out[0].is_some() && out[1].is_none() && out[2].is_some());
    }
}
