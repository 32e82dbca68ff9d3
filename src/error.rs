//! Error types for refmap.

use std::path::PathBuf;

/// Errors that abort a scan or an export.
///
/// Per-file problems (undecodable documents, unreadable directories) never
/// surface here; they are logged and the scan carries on.
#[derive(Debug, thiserror::Error)]
pub enum RefmapError {
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Error writing output to {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RefmapError>;
