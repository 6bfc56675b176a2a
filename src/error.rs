use std::path::PathBuf;

/// Errors that abort a whole scan.
///
/// Per-file problems never show up here: analyzers degrade instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan root not found or not a directory: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("scan cancelled after {completed} files")]
    Cancelled { completed: usize },
}

/// Errors raised while loading or writing configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
