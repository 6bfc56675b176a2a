//! # appdoc
//!
//! Codebase scanning engine: walks a source tree, analyzes each file with a
//! per-language strategy, and reports documentation coverage, size and an
//! approximate file dependency graph.
//!
//! ## Pipeline
//!
//! - **Discovery**: extension and ignore-rule filtering over a directory walk
//! - **Analysis**: one task per file on a bounded worker pool
//! - **Aggregation**: per-language summaries and a node-link dependency graph
//!
//! ## Supported Languages
//!
//! Python and Rust (syntax tree), JavaScript (patterns), TypeScript and C#
//! (line counts only).

pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod parsers;

use std::path::Path;

pub use crate::config::ScanConfig;
pub use crate::core::{
    CodebaseAnalyzer, DependencyGraph, FileMetric, LanguageSummary, ScanCancellation,
    ScanOptions, ScanResult,
};
pub use crate::error::{ConfigError, ScanError};

/// Scan `root` with default configuration.
///
/// ```no_run
/// let result = appdoc::scan(std::path::Path::new("src"), &appdoc::ScanOptions::default())?;
/// println!("{} files, {:.1}% documented", result.total_files(), result.overall_coverage());
/// # Ok::<(), appdoc::ScanError>(())
/// ```
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanResult, ScanError> {
    CodebaseAnalyzer::default().scan(root, options, &ScanCancellation::new())
}
