use dashmap::DashMap;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::metrics::{FileMetric, UNKNOWN_LANGUAGE};
use crate::config::resolve_concurrency;
use crate::error::ScanError;
use crate::parsers::AnalyzerRegistry;

/// Shared flag for stopping a scan between files.
///
/// Clones share the same flag; workers check it before starting each file.
#[derive(Debug, Clone, Default)]
pub struct ScanCancellation {
    flag: Arc<AtomicBool>,
}

impl ScanCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// What a run produced: metrics in input order, plus whether it stopped early.
#[derive(Debug)]
pub struct RunOutcome {
    pub metrics: Vec<FileMetric>,
    pub cancelled: bool,
}

/// Runs per-file analysis on a private, fixed-size worker pool.
pub struct ExecutionEngine {
    registry: AnalyzerRegistry,
    pool: rayon::ThreadPool,
    workers: usize,
}

impl ExecutionEngine {
    /// `concurrency == 0` sizes the pool to the host's logical core count.
    pub fn new(registry: AnalyzerRegistry, concurrency: usize) -> Result<Self, ScanError> {
        let workers = resolve_concurrency(concurrency);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("appdoc-worker-{i}"))
            .build()?;

        Ok(Self {
            registry,
            pool,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analyze every file, one task per file, and wait for all of them.
    ///
    /// A panicking analyzer yields a degraded `unknown` metric for that file.
    /// Once `cancellation` fires, files not yet started are skipped.
    pub fn run(&self, files: &[PathBuf], cancellation: &ScanCancellation) -> RunOutcome {
        let results: DashMap<usize, FileMetric> = DashMap::with_capacity(files.len());

        self.pool.install(|| {
            files.par_iter().enumerate().for_each(|(index, path)| {
                if cancellation.is_cancelled() {
                    return;
                }

                let metric = match catch_unwind(AssertUnwindSafe(|| self.registry.analyze(path))) {
                    Ok(metric) => metric,
                    Err(panic) => {
                        tracing::error!(
                            path = %path.display(),
                            reason = panic_message(panic.as_ref()),
                            "analyzer panicked"
                        );
                        FileMetric::degraded(path, UNKNOWN_LANGUAGE, 0)
                    }
                };
                results.insert(index, metric);
            });
        });

        let mut indexed: Vec<(usize, FileMetric)> = results.into_iter().collect();
        indexed.sort_unstable_by_key(|(index, _)| *index);
        let metrics: Vec<FileMetric> = indexed.into_iter().map(|(_, metric)| metric).collect();

        let cancelled = cancellation.is_cancelled() && metrics.len() < files.len();
        tracing::debug!(
            completed = metrics.len(),
            total = files.len(),
            cancelled,
            "analysis finished"
        );

        RunOutcome { metrics, cancelled }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
