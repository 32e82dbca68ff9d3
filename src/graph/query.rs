//
//  query.rs
//  Refmap
//
//  Created by hak (tharun)
//

use petgraph::Direction;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::engine::ReferenceGraph;
use super::types::*;

// Every query hands back owned, sorted collections; callers never see
// the graph's internal storage.
impl ReferenceGraph {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.file_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_index.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.file_index.contains_key(path)
    }

    /// All nodes.
    pub fn nodes(&self) -> BTreeSet<PathBuf> {
        self.file_index.keys().cloned().collect()
    }

    /// Files the given file references.
    pub fn targets(&self, node: &Path) -> BTreeSet<PathBuf> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Files that reference the given file.
    pub fn sources_of(&self, node: &Path) -> BTreeSet<PathBuf> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &Path, direction: Direction) -> BTreeSet<PathBuf> {
        match self.index_of(node) {
            Some(idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| self.graph[n].clone())
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// Nodes that no resolved edge points at.
    pub fn roots(&self) -> BTreeSet<PathBuf> {
        self.file_index
            .iter()
            .filter(|(_, &idx)| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Nodes taking part in at least one edge or relation.
    pub fn connected_nodes(&self) -> BTreeSet<PathBuf> {
        let mut connected = BTreeSet::new();
        for edge in self.graph.raw_edges() {
            connected.insert(self.graph[edge.source()].clone());
            connected.insert(self.graph[edge.target()].clone());
        }
        for map in [&self.missing, &self.remote, &self.templates] {
            connected.extend(
                map.iter()
                    .filter(|(_, set)| !set.is_empty())
                    .map(|(source, _)| source.clone()),
            );
        }
        connected
    }

    /// Every resolved edge, ordered by (source, target).
    pub fn edges(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut edges: Vec<_> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| (self.graph[e.source()].clone(), self.graph[e.target()].clone()))
            .collect();
        edges.sort();
        edges
    }

    /// Every relation of one category, ordered by (source, string).
    pub fn relations(&self, kind: RelationKind) -> Vec<(PathBuf, String)> {
        self.relation_map(kind)
            .iter()
            .flat_map(|(source, set)| set.iter().map(move |s| (source.clone(), s.clone())))
            .collect()
    }

    /// Relations of one category from a single source.
    pub fn relations_of(&self, node: &Path, kind: RelationKind) -> BTreeSet<String> {
        self.relation_map(kind).get(node).cloned().unwrap_or_default()
    }

    pub fn missing_of(&self, node: &Path) -> BTreeSet<String> {
        self.relations_of(node, RelationKind::Missing)
    }

    pub fn remote_of(&self, node: &Path) -> BTreeSet<String> {
        self.relations_of(node, RelationKind::Remote)
    }

    pub fn templates_of(&self, node: &Path) -> BTreeSet<String> {
        self.relations_of(node, RelationKind::Template)
    }

    pub fn has_missing(&self) -> bool {
        self.has_relations(RelationKind::Missing)
    }

    pub fn has_remote(&self) -> bool {
        self.has_relations(RelationKind::Remote)
    }

    pub fn has_templates(&self) -> bool {
        self.has_relations(RelationKind::Template)
    }

    fn has_relations(&self, kind: RelationKind) -> bool {
        self.relation_map(kind).values().any(|set| !set.is_empty())
    }

    /// Files that were scanned but could not be decoded.
    pub fn undecodable(&self) -> BTreeSet<PathBuf> {
        self.undecodable.clone()
    }

    /// Graph-wide counters.
    pub fn stats(&self) -> GraphStats {
        let count = |kind: RelationKind| -> usize {
            self.relation_map(kind).values().map(|s| s.len()).sum()
        };
        GraphStats {
            node_count: self.len(),
            edge_count: self.graph.edge_count(),
            missing_count: count(RelationKind::Missing),
            remote_count: count(RelationKind::Remote),
            template_count: count(RelationKind::Template),
            root_count: self.roots().len(),
            undecodable_count: self.undecodable.len(),
        }
    }
}
