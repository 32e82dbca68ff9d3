//
//  engine.rs
//  Refmap
//
//  Created by hak (tharun)
//

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::types::*;

/// Per-source sets of strings for one relation category.
pub(crate) type RelationMap = BTreeMap<PathBuf, BTreeSet<String>>;

/// The reference graph: files as nodes, resolved references as edges, plus
/// the missing / remote / template relations hanging off each source.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    /// Directed file-to-file edges. At most one edge per (source, target).
    pub(crate) graph: DiGraph<PathBuf, ()>,
    /// Index: canonical path -> node index.
    pub(crate) file_index: BTreeMap<PathBuf, NodeIndex>,
    pub(crate) missing: RelationMap,
    pub(crate) remote: RelationMap,
    pub(crate) templates: RelationMap,
    /// Scanned files the decoder gave up on.
    pub(crate) undecodable: BTreeSet<PathBuf>,
}

impl ReferenceGraph {
    /// Create a new empty reference graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            file_index: BTreeMap::new(),
            missing: BTreeMap::new(),
            remote: BTreeMap::new(),
            templates: BTreeMap::new(),
            undecodable: BTreeSet::new(),
        }
    }

    // ─── Node Operations ────────────────────────────────────────

    /// Add a file node. Adding a known path returns the existing index.
    pub fn add_node(&mut self, path: impl Into<PathBuf>) -> NodeIndex {
        let path = path.into();
        if let Some(&idx) = self.file_index.get(&path) {
            return idx;
        }
        let idx = self.graph.add_node(path.clone());
        self.file_index.insert(path, idx);
        idx
    }

    // ─── Edge Operations ────────────────────────────────────────

    /// Add a resolved edge; both endpoints become nodes. Repeats collapse.
    pub fn add_edge(&mut self, source: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        let from = self.add_node(source);
        let to = self.add_node(target);
        self.graph.update_edge(from, to, ());
    }

    /// Record an unresolved path string.
    ///
    /// Ignored if the same string is already a template relation of `source`.
    pub fn add_missing(&mut self, source: impl Into<PathBuf>, candidate: impl Into<String>) {
        let source = source.into();
        let candidate = candidate.into();
        self.add_node(source.clone());
        if self
            .templates
            .get(&source)
            .is_some_and(|set| set.contains(&candidate))
        {
            return;
        }
        self.missing.entry(source).or_default().insert(candidate);
    }

    /// Record a remote (URL) reference.
    pub fn add_remote(&mut self, source: impl Into<PathBuf>, url: impl Into<String>) {
        let source = source.into();
        self.add_node(source.clone());
        self.remote.entry(source).or_default().insert(url.into());
    }

    /// Record a template reference. Takes precedence over an equal missing one.
    pub fn add_template(&mut self, source: impl Into<PathBuf>, candidate: impl Into<String>) {
        let source = source.into();
        let candidate = candidate.into();
        self.add_node(source.clone());
        if let Some(set) = self.missing.get_mut(&source) {
            set.remove(&candidate);
            if set.is_empty() {
                self.missing.remove(&source);
            }
        }
        self.templates.entry(source).or_default().insert(candidate);
    }

    /// Mark a scanned file as undecodable. It stays a node.
    pub fn mark_undecodable(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_node(path.clone());
        self.undecodable.insert(path);
    }

    /// Fold one file's scan results into the graph.
    ///
    /// References back to the scanned file itself are dropped.
    pub fn ingest(&mut self, scan: FileScan) {
        let FileScan {
            file,
            decoded,
            references,
        } = scan;
        if decoded {
            self.add_node(file.clone());
        } else {
            self.mark_undecodable(file.clone());
        }

        for reference in references {
            match reference {
                Reference::Resolved(target) if target == file => {}
                Reference::Resolved(target) => self.add_edge(file.clone(), target),
                Reference::Missing(candidate) => self.add_missing(file.clone(), candidate),
                Reference::Remote(url) => self.add_remote(file.clone(), url),
                Reference::Template(candidate) => self.add_template(file.clone(), candidate),
            }
        }
    }

    // ─── Internal Helpers ───────────────────────────────────────

    pub(crate) fn index_of(&self, path: &Path) -> Option<NodeIndex> {
        self.file_index.get(path).copied()
    }

    pub(crate) fn relation_map(&self, kind: RelationKind) -> &RelationMap {
        match kind {
            RelationKind::Missing => &self.missing,
            RelationKind::Remote => &self.remote,
            RelationKind::Template => &self.templates,
        }
    }
}

impl Default for ReferenceGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let graph = ReferenceGraph::new();
        let stats = graph.stats();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = ReferenceGraph::new();
        let a = graph.add_node("/repo/a.yaml");
        let b = graph.add_node(PathBuf::from("/repo/a.yaml"));
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_edges_are_deduplicated() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("/repo/a.yaml", "/repo/b.yaml");
        graph.add_edge("/repo/a.yaml", "/repo/b.yaml");

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.stats().edge_count, 1);
        assert!(graph.contains(Path::new("/repo/b.yaml")));
    }

    #[test]
    fn test_relations_are_deduplicated() {
        let mut graph = ReferenceGraph::new();
        graph.add_missing("/repo/a.yaml", "gone.yaml");
        graph.add_missing("/repo/a.yaml", "gone.yaml");
        graph.add_remote("/repo/a.yaml", "https://example.com/schema");
        graph.add_remote("/repo/a.yaml", "https://example.com/schema");

        let stats = graph.stats();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.missing_count, 1);
        assert_eq!(stats.remote_count, 1);
    }

    #[test]
    fn test_template_takes_precedence_over_missing() {
        let mut graph = ReferenceGraph::new();
        let src = Path::new("/repo/a.yaml");

        graph.add_missing(src, "envs/{{ env }}.yaml");
        graph.add_template(src, "envs/{{ env }}.yaml");
        assert!(graph.missing_of(src).is_empty());
        assert!(!graph.has_missing());
        assert_eq!(graph.templates_of(src).len(), 1);

        graph.add_missing(src, "envs/{{ env }}.yaml");
        assert!(graph.missing_of(src).is_empty());
    }

    #[test]
    fn test_remote_and_template_may_overlap() {
        let mut graph = ReferenceGraph::new();
        let src = Path::new("/repo/a.yaml");
        let url = "https://example.com/{{ version }}/schema.json";
        graph.add_remote(src, url);
        graph.add_template(src, url);

        assert!(graph.remote_of(src).contains(url));
        assert!(graph.templates_of(src).contains(url));
    }

    #[test]
    fn test_ingest_drops_self_references() {
        let mut graph = ReferenceGraph::new();
        let file = PathBuf::from("/repo/a.yaml");
        graph.ingest(FileScan {
            file: file.clone(),
            decoded: true,
            references: vec![
                Reference::Resolved(file.clone()),
                Reference::Resolved(PathBuf::from("/repo/b.yaml")),
                Reference::Missing("nope.yaml".to_string()),
            ],
        });

        assert_eq!(graph.targets(&file).len(), 1);
        assert_eq!(graph.missing_of(&file).len(), 1);
        assert_eq!(graph.stats().edge_count, 1);
    }

    #[test]
    fn test_ingest_undecoded_keeps_node() {
        let mut graph = ReferenceGraph::new();
        graph.ingest(FileScan::undecoded(PathBuf::from("/repo/broken.json")));

        assert!(graph.contains(Path::new("/repo/broken.json")));
        assert_eq!(graph.stats().undecodable_count, 1);
        assert!(graph.connected_nodes().is_empty());
    }
}
