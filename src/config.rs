//
//  config.rs
//  Refmap
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{RefmapError, Result};
use crate::export::{Orientation, OutputFormat, TreeStyle};
use crate::graph::discovery::{
    normalize_extension, ScanOptions, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS,
};

/// File name looked up in the scanned root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".refmap.toml";

/// Top-level refmap configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefmapConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which files get scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Extensions to scan, with or without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names (or `*suffix` patterns) never descended into.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    /// Maximum directory depth below the root.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Output defaults. Command-line flags win over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub ascii_style: Option<TreeStyle>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub group_by_dir: bool,
    #[serde(default)]
    pub ignore_missing: bool,
    #[serde(default)]
    pub ignore_remote: bool,
    #[serde(default)]
    pub ignore_templates: bool,
    #[serde(default)]
    pub show_all: bool,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            max_depth: None,
        }
    }
}

impl ScanConfig {
    /// Turn the config section into walker options.
    pub fn to_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            exclude_dirs: self.exclude_dirs.iter().cloned().collect(),
            max_depth: self.max_depth,
        }
    }
}

impl RefmapConfig {
    /// Load config from a TOML file. A file that does not exist yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents).map_err(|e| RefmapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the config for a scan of `root`.
    ///
    /// An explicitly named file has to exist; the implicit `.refmap.toml`
    /// in the root is optional.
    pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(RefmapError::Config {
                        path: path.to_path_buf(),
                        message: "file not found".to_string(),
                    });
                }
                Self::load(path)
            }
            None => Self::load(&Self::default_path(root)),
        }
    }

    /// Where the implicit config lives for a given root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }
}
