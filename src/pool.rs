//! Bounded-parallel file processing
//!
//! `WorkerPool` runs one task per discovered file. With a single job the
//! files are processed in input order on the calling task. With more, up to
//! `jobs` tasks run concurrently and results arrive in completion order, so
//! callers must treat the returned list as a multiset.
//!
//! `FileScorer` is the per-file lifecycle each task runs: size budget, read,
//! cache lookup, scoring, cache write.

use crate::budget::{self, Verdict};
use crate::cache::{self, CacheStore};
use crate::context::RunContext;
use crate::discovery::DiscoveredFile;
use crate::models::{FileResult, FileStatus};
use crate::scoring::ScoreOutcome;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Runs a per-file job over many files with bounded concurrency
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    jobs: usize,
}

impl WorkerPool {
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Process every file and return one result per file.
    ///
    /// A job that panics yields a `calc_error` result for its file instead of
    /// aborting the run. `on_result` is called as each result arrives.
    pub async fn run<F, Fut>(
        &self,
        files: Vec<DiscoveredFile>,
        work: F,
        mut on_result: impl FnMut(&FileResult),
    ) -> Vec<FileResult>
    where
        F: Fn(DiscoveredFile) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = FileResult> + Send + 'static,
    {
        let mut results = Vec::with_capacity(files.len());

        if self.jobs == 1 {
            for file in files {
                let path = file.display_path();
                let result = match FutureExt::catch_unwind(AssertUnwindSafe(work(file))).await {
                    Ok(result) => result,
                    Err(payload) => panicked(path, &*payload),
                };
                on_result(&result);
                results.push(result);
            }
            return results;
        }

        debug!("Scoring {} files with {} workers", files.len(), self.jobs);
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut pending = FuturesUnordered::new();

        for file in files {
            let path = file.display_path();
            let semaphore = Arc::clone(&semaphore);
            let work = work.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                work(file).await
            });
            pending.push(async move { (path, handle.await) });
        }

        while let Some((path, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => panicked(path, &*e.into_panic()),
                Err(e) => FileResult::failed(path, FileStatus::CalcError, e.to_string()),
            };
            on_result(&result);
            results.push(result);
        }

        results
    }
}

fn panicked(path: String, payload: &(dyn Any + Send)) -> FileResult {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    warn!("Scoring {} panicked: {}", path, message);
    FileResult::failed(path, FileStatus::CalcError, format!("Scoring failed: {message}"))
}

/// Full lifecycle of one file within a run
#[derive(Debug, Clone)]
pub struct FileScorer {
    ctx: Arc<RunContext>,
    cache: Option<CacheStore>,
}

impl FileScorer {
    pub fn new(ctx: Arc<RunContext>) -> Self {
        let cache = ctx.config.cache_enabled().then(|| {
            CacheStore::new(ctx.config.cache_dir.clone(), ctx.config.cache_cap_bytes())
        });
        Self { ctx, cache }
    }

    pub async fn process(&self, file: DiscoveredFile) -> FileResult {
        let started = Instant::now();
        let path = file.display_path();

        let limits = self.ctx.config.budget_limits();
        if let Verdict::Exceeded(breach) = budget::check_file(file.size, &limits) {
            debug!("Skipping {}: {}", path, breach);
            return FileResult {
                size_bytes: file.size,
                ..FileResult::failed(path, FileStatus::BudgetExceeded, breach.trace())
            };
        }

        let bytes = match fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", path, e);
                return FileResult {
                    size_bytes: file.size,
                    ..FileResult::failed(
                        path,
                        FileStatus::IoError,
                        format!("Failed to read file: {e}"),
                    )
                };
            }
        };

        let key = self.cache_key(&path, &bytes);
        if let (Some(store), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = store.get_for(key, &path).await {
                return hit;
            }
        }

        let outcome = match std::str::from_utf8(&bytes) {
            Ok(text) => self.ctx.engine.score(text, self.ctx.file_seed(&path)),
            Err(e) => ScoreOutcome {
                score: 0.0,
                status: FileStatus::CalcError,
                trace: format!("Input is not valid UTF-8: {e}"),
            },
        };

        let result = FileResult {
            path,
            score: outcome.score,
            status: outcome.status,
            trace: outcome.trace,
            size_bytes: bytes.len() as u64,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        };

        if let (Some(store), Some(key)) = (&self.cache, &key) {
            if let Err(e) = store.put(key, &result).await {
                warn!("Failed to cache result for {}: {}", result.path, e);
            }
        }

        result
    }

    fn cache_key(&self, path: &str, bytes: &[u8]) -> Option<String> {
        self.cache.as_ref()?;
        match cache::key_for(&self.ctx, bytes) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Cannot derive cache key for {}: {}", path, e);
                None
            }
        }
    }
}
