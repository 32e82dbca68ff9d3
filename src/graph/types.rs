//
//  types.rs
//  Refmap
//
//  Created by hak (tharun)
//

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One classified outcome for a string found in a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reference {
    /// Candidate resolved to an existing file in the repository.
    Resolved(PathBuf),
    /// Candidate that resolved to nothing.
    Missing(String),
    /// HTTP(S) URL.
    Remote(String),
    /// String carrying an unrendered `{{ ... }}` placeholder.
    Template(String),
}

/// Everything one file contributed to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScan {
    /// Canonical path of the scanned file.
    pub file: PathBuf,
    /// False when the file could not be decoded.
    pub decoded: bool,
    pub references: Vec<Reference>,
}

impl FileScan {
    /// A file that stays a node but contributes no references.
    pub fn undecoded(file: PathBuf) -> Self {
        Self {
            file,
            decoded: false,
            references: Vec::new(),
        }
    }
}

/// Relation categories other than resolved edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    Missing,
    Remote,
    Template,
}

impl RelationKind {
    /// Bracketed tag used by the text outputs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Missing => "[MISSING]",
            Self::Remote => "[REMOTE]",
            Self::Template => "[TEMPLATE]",
        }
    }
}

/// Graph-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub missing_count: usize,
    pub remote_count: usize,
    pub template_count: usize,
    pub root_count: usize,
    pub undecodable_count: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "files:{} edges:{} missing:{} remote:{} templates:{} roots:{} undecodable:{}",
            self.node_count,
            self.edge_count,
            self.missing_count,
            self.remote_count,
            self.template_count,
            self.root_count,
            self.undecodable_count
        )
    }
}
