use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::graph::DependencyGraph;
use super::metrics::{coverage_percentage, FileMetric, LanguageSummary};

/// Everything one scan produced. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    scan_path: PathBuf,
    timestamp: String,
    duration_seconds: f64,
    total_files: usize,
    total_lines: usize,
    language_summaries: BTreeMap<String, LanguageSummary>,
    file_metrics: Vec<FileMetric>,
    dependency_graph: DependencyGraph,
    ignored_patterns: Vec<String>,
}

impl ScanResult {
    pub(crate) fn new(
        scan_path: PathBuf,
        timestamp: String,
        duration_seconds: f64,
        language_summaries: BTreeMap<String, LanguageSummary>,
        file_metrics: Vec<FileMetric>,
        dependency_graph: DependencyGraph,
        ignored_patterns: Vec<String>,
    ) -> Self {
        Self {
            total_files: file_metrics.len(),
            total_lines: file_metrics.iter().map(|m| m.lines).sum(),
            scan_path,
            timestamp,
            duration_seconds,
            language_summaries,
            file_metrics,
            dependency_graph,
            ignored_patterns,
        }
    }

    pub fn scan_path(&self) -> &Path {
        &self.scan_path
    }

    /// Scan start time, RFC 3339 in UTC.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn language_summaries(&self) -> &BTreeMap<String, LanguageSummary> {
        &self.language_summaries
    }

    pub fn language_summary(&self, language: &str) -> Option<&LanguageSummary> {
        self.language_summaries.get(language)
    }

    /// Per-file metrics, sorted by path.
    pub fn file_metrics(&self) -> &[FileMetric] {
        &self.file_metrics
    }

    pub fn file_metric(&self, path: &Path) -> Option<&FileMetric> {
        self.file_metrics.iter().find(|m| m.path == path)
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dependency_graph
    }

    pub fn ignored_patterns(&self) -> &[String] {
        &self.ignored_patterns
    }

    pub fn total_functions(&self) -> usize {
        self.language_summaries.values().map(|s| s.functions).sum()
    }

    pub fn total_documented_functions(&self) -> usize {
        self.language_summaries
            .values()
            .map(|s| s.documented_functions)
            .sum()
    }

    pub fn total_classes(&self) -> usize {
        self.language_summaries.values().map(|s| s.classes).sum()
    }

    pub fn total_documented_classes(&self) -> usize {
        self.language_summaries
            .values()
            .map(|s| s.documented_classes)
            .sum()
    }

    pub fn overall_coverage(&self) -> f64 {
        coverage_percentage(
            self.total_functions(),
            self.total_documented_functions(),
            self.total_classes(),
            self.total_documented_classes(),
        )
    }
}
