use std::path::Path;

use super::common::{count_lines, read_source};
use super::LanguageParser;
use crate::core::FileMetric;

/// Placeholder for a language without structural extraction yet.
///
/// Claims its extensions so files are attributed to the right language, but
/// only reports a line count.
pub struct StubParser {
    language: &'static str,
    extensions: &'static [&'static str],
}

impl StubParser {
    pub const fn new(language: &'static str, extensions: &'static [&'static str]) -> Self {
        Self {
            language,
            extensions,
        }
    }

    pub const fn typescript() -> Self {
        Self::new("typescript", &["ts", "tsx"])
    }

    pub const fn csharp() -> Self {
        Self::new("csharp", &["cs"])
    }
}

impl LanguageParser for StubParser {
    fn language_name(&self) -> &str {
        self.language
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn analyze(&self, file_path: &Path) -> FileMetric {
        let lines = match read_source(file_path) {
            Ok(source) => count_lines(&source),
            Err(unreadable) => {
                tracing::warn!(path = %file_path.display(), "unable to read file as UTF-8");
                unreadable.lines
            }
        };
        FileMetric::degraded(file_path, self.language, lines)
    }
}
