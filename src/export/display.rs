//
//  display.rs
//  Refmap
//
//  Created by hak (tharun)
//

use std::path::{Path, PathBuf};

use crate::resolver::canonical;

/// Turns canonical node paths into the short names shown to users.
///
/// A path is shown relative to the display base if it lies under it, else
/// relative to the repository root, else as-is. Separators are always `/`.
#[derive(Debug, Clone)]
pub struct DisplayPaths {
    root: PathBuf,
    base: PathBuf,
}

impl DisplayPaths {
    /// `base` defaults to the root.
    pub fn new(root: &Path, base: Option<&Path>) -> Self {
        let root = canonical(root);
        let base = base.map(canonical).unwrap_or_else(|| root.clone());
        Self { root, base }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Human-readable name for a node.
    pub fn name(&self, path: &Path) -> String {
        relative_to(path, &self.base)
            .or_else(|| relative_to(path, &self.root))
            .map(|rel| forward_slashes(&rel))
            .unwrap_or_else(|| forward_slashes(path))
    }

    /// Path relative to the repository root, if it lies under it.
    pub fn root_relative(&self, path: &Path) -> Option<PathBuf> {
        relative_to(path, &self.root)
    }
}

fn relative_to(path: &Path, prefix: &Path) -> Option<PathBuf> {
    path.strip_prefix(prefix)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_base_then_root_then_raw() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();

        let display = DisplayPaths::new(&root, Some(&root.join("config")));
        assert_eq!(display.name(&root.join("config/app.yaml")), "app.yaml");
        assert_eq!(display.name(&root.join("data/users.json")), "data/users.json");
        assert_eq!(display.name(Path::new("/elsewhere/x.yaml")), "/elsewhere/x.yaml");
    }

    #[test]
    fn test_base_defaults_to_root() {
        let dir = tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();

        let display = DisplayPaths::new(&root, None);
        assert_eq!(display.base(), display.root());
        assert_eq!(display.name(&root.join("a/b/c.toml")), "a/b/c.toml");
        assert_eq!(
            display.root_relative(&root.join("a/b/c.toml")),
            Some(PathBuf::from("a/b/c.toml"))
        );
        assert_eq!(display.root_relative(Path::new("/outside/c.toml")), None);
    }
}
