//
//  format.rs
//  Refmap
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structured document formats the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
    /// Unknown extension: try JSON, then YAML.
    Sniff,
}

impl DocumentFormat {
    /// Pick a format from a file's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Sniff,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Sniff => "sniffed",
        }
    }
}
