use std::path::Path;

use super::common::{count_lines, read_source};
use super::LanguageParser;
use crate::core::{FileMetric, UNKNOWN_LANGUAGE};

/// Line counter for files no registered analyzer claims.
pub struct LineCounter;

impl LanguageParser for LineCounter {
    fn language_name(&self) -> &str {
        UNKNOWN_LANGUAGE
    }

    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn can_handle(&self, _file_path: &Path) -> bool {
        true
    }

    fn analyze(&self, file_path: &Path) -> FileMetric {
        let lines = match read_source(file_path) {
            Ok(source) => count_lines(&source),
            Err(unreadable) => unreadable.lines,
        };
        FileMetric::degraded(file_path, UNKNOWN_LANGUAGE, lines)
    }
}
