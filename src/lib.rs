//! # refmap
//!
//! Cross-file reference mapping for configuration-heavy repositories.
//!
//! refmap walks a directory, decodes every YAML, JSON and TOML file it finds,
//! and pulls out the strings that look like references to other files or to
//! URLs. Each candidate is resolved against the repository; the result is a
//! directed graph that can be rendered as a tree, a Mermaid flowchart or a
//! JSON edge list.
//!
//! ## Key Features
//!
//! - **Heuristic**: key names and value shapes decide what counts as a path
//! - **Contained**: references only resolve to files inside the root
//! - **Honest**: unresolved, remote and templated references stay visible
//! - **Deterministic**: the same tree always renders the same output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refmap::{build_graph, render, DisplayPaths, ExportOptions, OutputFormat, ScanOptions};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let graph = build_graph(root, &ScanOptions::default()).unwrap();
//!
//! let display = DisplayPaths::new(root, None);
//! let tree = render(&graph, &display, OutputFormat::Ascii, &ExportOptions::default()).unwrap();
//! println!("{}", tree);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod parser;
pub mod resolver;

// Re-exports for convenience
pub use config::RefmapConfig;
pub use error::{RefmapError, Result};
pub use export::{render, DisplayPaths, ExportOptions, Orientation, OutputFormat, TreeStyle};
pub use graph::{build_graph, scan_file, GraphStats, ReferenceGraph, ScanOptions};
pub use parser::{decode_file, extract_references, Document};
pub use resolver::PathResolver;
