//
//  discovery.rs
//  Refmap
//
//  Created by hak (tharun)
//

use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".json", ".toml"];

/// Directories that are never descended into unless reconfigured.
/// Entries starting with `*` match by suffix.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".tox",
    ".nox",
    "venv",
    ".venv",
    "env",
    ".env",
    ".idea",
    ".vscode",
    "build",
    "dist",
    ".eggs",
    "*.egg-info",
];

/// What the directory walk picks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lower-case extensions with a leading dot.
    pub extensions: BTreeSet<String>,
    /// Excluded directory names and `*suffix` patterns.
    pub exclude_dirs: BTreeSet<String>,
    /// Deepest directory level (below the root) whose files are listed.
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_depth: None,
        }
    }
}

impl ScanOptions {
    /// Does this file's extension match the filter?
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&normalize_extension(e)))
    }

    /// Is a directory with this name skipped?
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        is_excluded(&self.exclude_dirs, name)
    }
}

fn is_excluded(patterns: &BTreeSet<String>, name: &str) -> bool {
    if patterns.contains(name) {
        return true;
    }
    patterns
        .iter()
        .filter_map(|p| p.strip_prefix('*'))
        .any(|suffix| name.ends_with(suffix.trim_start_matches('*')))
}

/// `YAML`, `.yaml` and `yaml` all become `.yaml`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// List every matching file under `root`, sorted by name within each directory.
///
/// No ignore files or hidden-file rules apply: this is a plain filtered
/// listing. Entries that cannot be read are skipped.
pub fn discover_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let exclude = options.exclude_dirs.clone();

    // The walker counts the root's own entries as depth 1.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(options.max_depth.map(|d| d + 1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !is_excluded(&exclude, &name)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file())
                    && options.matches_extension(entry.path())
                {
                    files.push(entry.into_path());
                }
            }
            Err(e) => debug!(error = %e, "skipping unreadable entry"),
        }
    }
    files
}
