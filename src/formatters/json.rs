use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::ScanResult;

/// File name the CLI writes the scan into.
pub const RESULT_FILE_NAME: &str = "scan_results.json";

/// Serializes a `ScanResult` in the camelCase schema report generators consume.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn format(&self, result: &ScanResult) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(json)
    }

    pub fn format_to_file(&self, result: &ScanResult, output_path: &Path) -> Result<()> {
        let json_content = self.format(result)?;
        fs::write(output_path, json_content)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        Ok(())
    }

    /// Create `dir` if needed and write `scan_results.json` into it.
    pub fn write_to_dir(&self, result: &ScanResult, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        let output_path = dir.join(RESULT_FILE_NAME);
        self.format_to_file(result, &output_path)?;
        Ok(output_path)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
