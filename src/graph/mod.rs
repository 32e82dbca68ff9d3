//! Reference graph: file discovery, the graph model, and the scan that fills it.
//!
//! Files become nodes. A candidate that resolves to a file becomes an edge;
//! everything else hangs off its source file as a missing, remote or
//! template relation.

pub mod builder;
pub mod discovery;
pub mod engine;
pub mod query;
pub mod types;

pub use builder::{build_graph, scan_file};
pub use discovery::{
    discover_files, normalize_extension, ScanOptions, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS,
};
pub use engine::ReferenceGraph;
pub use types::{FileScan, GraphStats, Reference, RelationKind};
