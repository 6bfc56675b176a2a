pub mod common;
pub mod fallback;
pub mod javascript;
pub mod python;
pub mod rust;
pub mod stub;

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::FileMetric;

/// A per-language analysis strategy.
///
/// Implementations hold no mutable state, so one instance can serve many
/// worker threads at once. `analyze` never fails: unreadable or unparsable
/// files come back as degraded metrics.
pub trait LanguageParser: Send + Sync {
    fn language_name(&self) -> &str;

    fn extensions(&self) -> &[&str];

    fn can_handle(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn analyze(&self, file_path: &Path) -> FileMetric;
}

/// Ordered list of analyzers; the first one whose `can_handle` accepts a path wins.
pub struct AnalyzerRegistry {
    parsers: Vec<Box<dyn LanguageParser>>,
    fallback: fallback::LineCounter,
    max_file_size: Option<u64>,
}

impl AnalyzerRegistry {
    /// Every built-in analyzer, in dispatch order.
    pub fn new() -> Self {
        Self::with_parsers(vec![
            Box::new(python::PythonParser::new()),
            Box::new(rust::RustParser::new()),
            Box::new(javascript::JavaScriptParser::new()),
            Box::new(stub::StubParser::typescript()),
            Box::new(stub::StubParser::csharp()),
        ])
    }

    pub fn with_parsers(parsers: Vec<Box<dyn LanguageParser>>) -> Self {
        Self {
            parsers,
            fallback: fallback::LineCounter,
            max_file_size: None,
        }
    }

    /// Keep only analyzers whose language is listed (case-insensitive).
    pub fn filtered<S: AsRef<str>>(self, languages: &[S]) -> Self {
        let parsers = self
            .parsers
            .into_iter()
            .filter(|parser| {
                languages
                    .iter()
                    .any(|lang| lang.as_ref().trim().eq_ignore_ascii_case(parser.language_name()))
            })
            .collect();
        Self { parsers, ..self }
    }

    /// Files above `bytes` are line-counted without structural analysis.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    pub fn languages(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.language_name()).collect()
    }

    /// Union of every active analyzer's extensions, lowercased.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions().iter().map(|ext| ext.to_ascii_lowercase()))
            .collect()
    }

    pub fn get_parser(&self, file_path: &Path) -> Option<&dyn LanguageParser> {
        self.parsers
            .iter()
            .find(|p| p.can_handle(file_path))
            .map(|p| p.as_ref())
    }

    /// Dispatch a file to its analyzer, or to the line counter when none claims it.
    pub fn analyze(&self, file_path: &Path) -> FileMetric {
        let parser: &dyn LanguageParser = match self.get_parser(file_path) {
            Some(parser) => parser,
            None => &self.fallback,
        };

        if let Some(limit) = self.max_file_size {
            let size = std::fs::metadata(file_path).map(|m| m.len()).unwrap_or(0);
            if size > limit {
                tracing::warn!(
                    path = %file_path.display(),
                    size,
                    limit,
                    "file exceeds size limit, counting lines only"
                );
                return FileMetric::degraded(
                    file_path,
                    parser.language_name(),
                    common::count_lines_streaming(file_path),
                );
            }
        }

        parser.analyze(file_path)
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
