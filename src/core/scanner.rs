use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::SELF_EXCLUDES;
use crate::error::ScanError;

const DEFAULT_MAX_DEPTH: usize = 64;

/// A single ignore pattern, classified once up front.
#[derive(Debug, Clone)]
enum IgnoreRule {
    /// Pattern ending in a separator: everything under this root-relative directory.
    DirPrefix(String),
    /// Anything else: shell glob, compiled into the scanner's `GlobSet`.
    Glob,
}

/// Walks a root directory and collects the files analyzers will see.
///
/// Symbolic links are never followed and symlinked files are skipped.
pub struct FileScanner {
    rules: Vec<IgnoreRule>,
    globs: GlobSet,
    excluded_dirs: Vec<PathBuf>,
    max_depth: usize,
}

impl FileScanner {
    /// Compile ignore patterns; fails on the first malformed glob.
    pub fn new<S: AsRef<str>>(ignore_patterns: &[S]) -> Result<Self, ScanError> {
        let mut rules = Vec::with_capacity(ignore_patterns.len());
        let mut builder = GlobSetBuilder::new();

        for pattern in ignore_patterns {
            let raw = pattern.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let normalized = normalize(raw);
            // Rules are root-relative; `./build/` and `/build/` both mean `build/`.
            let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
            let normalized = normalized.trim_start_matches('/');
            if normalized.is_empty() {
                continue;
            }

            if raw.ends_with('/') || raw.ends_with('\\') {
                rules.push(IgnoreRule::DirPrefix(normalized.to_string()));
            } else {
                let glob = Glob::new(normalized).map_err(|source| ScanError::InvalidPattern {
                    pattern: raw.to_string(),
                    source,
                })?;
                builder.add(glob);
                rules.push(IgnoreRule::Glob);
            }
        }

        let globs = builder.build().map_err(|source| ScanError::InvalidPattern {
            pattern: ignore_patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;

        let mut excluded_dirs = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            excluded_dirs.push(canonical_or_same(&exe_dir));
        }

        Ok(Self {
            rules,
            globs,
            excluded_dirs,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Never descend into `dir`; used for the report output directory.
    pub fn with_excluded_dir(mut self, dir: &Path) -> Self {
        self.excluded_dirs.push(canonical_or_same(dir));
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Collect files under `root` whose lowercased extension is in `allowed_extensions`.
    ///
    /// Paths are absolute (under the canonical root), unique, and in walk order
    /// with entries sorted by file name.
    pub fn discover(
        &self,
        root: &Path,
        allowed_extensions: &BTreeSet<String>,
    ) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize().map_err(|_| ScanError::RootNotFound {
            path: root.to_path_buf(),
        })?;

        // Only directories strictly below the root can be excluded.
        let excluded: Vec<&Path> = self
            .excluded_dirs
            .iter()
            .map(PathBuf::as_path)
            .filter(|dir| dir.starts_with(&root) && *dir != root.as_path())
            .collect();

        let mut seen = HashSet::new();
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_pruned(entry, &root, &excluded));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let accepted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| allowed_extensions.contains(&ext.to_ascii_lowercase()))
                .unwrap_or(false);
            if !accepted {
                continue;
            }

            let relative = relative_path(path, &root);
            if self.is_ignored_file(&relative) {
                tracing::trace!(path = %relative, "ignored");
                continue;
            }

            if seen.insert(path.to_path_buf()) {
                files.push(path.to_path_buf());
            }
        }

        tracing::debug!(root = %root.display(), files = files.len(), "discovery finished");
        Ok(files)
    }

    /// Directories cut from the walk entirely.
    fn is_pruned(&self, entry: &DirEntry, root: &Path, excluded: &[&Path]) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if SELF_EXCLUDES.iter().any(|excluded| name == *excluded) {
            return true;
        }
        if excluded.iter().any(|dir| entry.path().starts_with(dir)) {
            return true;
        }

        let relative = relative_path(entry.path(), root);
        let as_dir = format!("{relative}/");
        self.rules.iter().any(|rule| match rule {
            IgnoreRule::DirPrefix(prefix) => as_dir.starts_with(prefix.as_str()),
            IgnoreRule::Glob => false,
        }) || self.globs.is_match(&relative)
            || self.globs.is_match(&*name)
    }

    /// Ignore rules for a file: directory prefix, or glob against the
    /// relative path or the immediate parent directory name.
    fn is_ignored_file(&self, relative: &str) -> bool {
        let under_prefix = self.rules.iter().any(|rule| match rule {
            IgnoreRule::DirPrefix(prefix) => relative.starts_with(prefix.as_str()),
            IgnoreRule::Glob => false,
        });
        if under_prefix {
            return true;
        }

        if self.globs.is_match(relative) {
            return true;
        }
        relative
            .rsplit_once('/')
            .and_then(|(dir, _)| dir.rsplit('/').next())
            .map(|parent| self.globs.is_match(parent))
            .unwrap_or(false)
    }
}

/// Root-relative path with `/` separators.
fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize(&relative.to_string_lossy())
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

fn canonical_or_same(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
