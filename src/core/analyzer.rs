use chrono::{SecondsFormat, Utc};
use std::path::Path;
use std::time::Instant;

use super::aggregator::aggregate;
use super::engine::{ExecutionEngine, ScanCancellation};
use super::graph::GraphBuilder;
use super::result::ScanResult;
use super::scanner::FileScanner;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::parsers::AnalyzerRegistry;

/// Per-call overrides; `None` falls back to the analyzer's configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub ignore_patterns: Option<Vec<String>>,
    /// Restrict discovery and dispatch to these analyzers.
    pub languages: Option<Vec<String>>,
    /// Analyze at most this many discovered files.
    pub max_files: Option<usize>,
    pub concurrency: Option<usize>,
}

/// Runs discovery, analysis, aggregation and graph building for one root.
pub struct CodebaseAnalyzer {
    config: ScanConfig,
}

impl CodebaseAnalyzer {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn scan(
        &self,
        root: &Path,
        options: &ScanOptions,
        cancellation: &ScanCancellation,
    ) -> Result<ScanResult, ScanError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        if !root.is_dir() {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize().map_err(|_| ScanError::RootNotFound {
            path: root.to_path_buf(),
        })?;

        let ignore_patterns = options
            .ignore_patterns
            .clone()
            .unwrap_or_else(|| self.config.ignore.clone());

        let registry = self.registry(options.languages.as_deref());
        let mut scanner =
            FileScanner::new(&ignore_patterns)?.with_max_depth(self.config.max_depth);
        if let Some(output_dir) = &self.config.output_dir {
            scanner = scanner.with_excluded_dir(output_dir);
        }

        tracing::info!(root = %root.display(), languages = ?registry.languages(), "scan started");

        let mut files = scanner.discover(&root, &registry.extensions())?;
        if let Some(limit) = options.max_files {
            if files.len() > limit {
                tracing::info!(discovered = files.len(), limit, "truncating file list");
                files.truncate(limit);
            }
        }

        let concurrency = options.concurrency.unwrap_or(self.config.concurrency);
        let engine = ExecutionEngine::new(registry, concurrency)?;
        tracing::debug!(files = files.len(), workers = engine.workers(), "dispatching");

        let outcome = engine.run(&files, cancellation);
        if outcome.cancelled {
            tracing::warn!(completed = outcome.metrics.len(), "scan cancelled");
            return Err(ScanError::Cancelled {
                completed: outcome.metrics.len(),
            });
        }

        let mut metrics = outcome.metrics;
        metrics.sort_by(|a, b| a.path.cmp(&b.path));

        let summaries = aggregate(&metrics);
        let graph = GraphBuilder::from_metrics(&root, &metrics).build();
        let duration = clock.elapsed().as_secs_f64();

        let result = ScanResult::new(
            root,
            started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            duration,
            summaries,
            metrics,
            graph,
            ignore_patterns,
        );

        tracing::info!(
            files = result.total_files(),
            lines = result.total_lines(),
            edges = result.dependency_graph().edges.len(),
            seconds = duration,
            "scan finished"
        );
        Ok(result)
    }

    fn registry(&self, languages: Option<&[String]>) -> AnalyzerRegistry {
        let registry = AnalyzerRegistry::new().with_max_file_size(self.config.max_file_size);
        let Some(languages) = languages else {
            return registry;
        };

        let known = registry.languages();
        for language in languages {
            if !known
                .iter()
                .any(|name| name.eq_ignore_ascii_case(language.trim()))
            {
                tracing::warn!(language = %language, "no analyzer for requested language");
            }
        }
        registry.filtered(languages)
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
