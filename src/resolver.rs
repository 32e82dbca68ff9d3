//! Path resolution: map a candidate string to a file inside the repository.
//!
//! Strategies, first hit wins:
//! 1. relative to the referencing file's directory
//! 2. relative to the repository root
//! 3. as a literal absolute path (only if the candidate was written absolute)
//! 4. relative to each ancestor of the referencing file's directory, up to the root
//!
//! A hit must be an existing regular file whose canonical path lies under
//! the canonical root.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolves candidates against one repository root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for `root`. The root is canonicalized when possible.
    pub fn new(root: &Path) -> Self {
        Self {
            root: canonical(root),
        }
    }

    /// The canonical repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `candidate` as written in `source_file`.
    pub fn resolve(&self, source_file: &Path, candidate: &str) -> Option<PathBuf> {
        if candidate.is_empty() {
            return None;
        }

        let forward = candidate.replace('\\', "/");
        let written_absolute = Path::new(&forward).is_absolute();
        let relative = Path::new(forward.trim_start_matches('/'));

        let source_dir = source_file
            .parent()
            .map(canonical)
            .unwrap_or_else(|| self.root.clone());

        if let Some(found) = self.existing_file(&source_dir.join(relative)) {
            return Some(found);
        }

        if let Some(found) = self.existing_file(&self.root.join(relative)) {
            return Some(found);
        }

        if written_absolute {
            if let Some(found) = self.existing_file(Path::new(&forward)) {
                return Some(found);
            }
        }

        for ancestor in source_dir.ancestors().skip(1) {
            if !ancestor.starts_with(&self.root) {
                break;
            }
            if let Some(found) = self.existing_file(&ancestor.join(relative)) {
                return Some(found);
            }
        }

        None
    }

    /// Canonical form of `path` if it is a regular file inside the root.
    ///
    /// `..` may step out of a directory that does not exist, so a failed
    /// canonicalization is retried on the lexically normalized path.
    fn existing_file(&self, path: &Path) -> Option<PathBuf> {
        let resolved = fs::canonicalize(path)
            .or_else(|_| fs::canonicalize(normalize_lexically(path)))
            .ok()?;
        if resolved.is_file() && self.contains(&resolved) {
            Some(resolved)
        } else {
            None
        }
    }

    /// Component-wise containment of a canonical path.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

/// Resolve a single candidate without keeping a resolver around.
pub fn resolve_candidate_path(source_file: &Path, candidate: &str, root: &Path) -> Option<PathBuf> {
    PathResolver::new(root).resolve(source_file, candidate)
}

/// Fold `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Canonicalize, keeping the original path when that fails.
pub(crate) fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
