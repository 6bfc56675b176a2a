//! Scan configuration and the `appdoc.config.json` file format.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "appdoc.config.json";

/// Ignore patterns applied when the caller supplies none.
pub const DEFAULT_IGNORES: &[&str] = &["__pycache__", "node_modules", ".git", "venv", ".venv"];

/// Directory names the tool writes into; never scanned.
pub const SELF_EXCLUDES: &[&str] = &[".appdoc", "appdoc-reports"];

/// Configuration shared by the CLI and library callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Ignore rules; a trailing `/` means directory prefix, anything else is a glob.
    pub ignore: Vec<String>,
    /// Report formats requested from downstream generators.
    pub output_formats: Vec<String>,
    /// Files larger than this many bytes are line-counted only.
    pub max_file_size: u64,
    /// Maximum directory depth walked below the scan root.
    pub max_depth: usize,
    /// Worker count; 0 uses every logical core.
    pub concurrency: usize,
    /// Where reports are written; excluded from discovery when under the root.
    pub output_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
            output_formats: vec!["json".to_string(), "html".to_string(), "markdown".to_string()],
            max_file_size: 5 * 1024 * 1024,
            max_depth: 64,
            concurrency: 0,
            output_dir: None,
        }
    }
}

impl ScanConfig {
    /// Worker count with `0` resolved to the host's logical core count.
    pub fn effective_concurrency(&self) -> usize {
        resolve_concurrency(self.concurrency)
    }
}

pub(crate) fn resolve_concurrency(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Load a config file, layering its keys over the defaults.
///
/// A missing file is not an error: the defaults are returned.
pub fn load_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no configuration file found, using defaults");
        return Ok(ScanConfig::default());
    }

    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Write the default configuration as pretty JSON.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(&ScanConfig::default()).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(io_err)
}
