//! Output forms for a reference graph: indented tree, Mermaid flowchart
//! and a JSON edge list.
//!
//! All three read the graph through its query methods only and share the
//! same [`ExportOptions`] for category filtering and node scope.

pub mod display;
pub mod json;
pub mod mermaid;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::graph::{ReferenceGraph, RelationKind};

pub use display::DisplayPaths;
pub use json::to_json;
pub use mermaid::{to_mermaid, Orientation};
pub use tree::{render_tree, TreeStyle};

/// Which output form to produce.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree text.
    #[default]
    Ascii,
    /// Mermaid flowchart.
    Mermaid,
    /// JSON node and edge lists.
    Json,
}

/// Knobs shared by every output form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_missing: bool,
    pub include_remote: bool,
    pub include_templates: bool,
    /// Also list files with no edges and no relations.
    pub show_all: bool,
    pub tree_style: TreeStyle,
    pub orientation: Orientation,
    pub group_by_dir: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_missing: true,
            include_remote: true,
            include_templates: true,
            show_all: false,
            tree_style: TreeStyle::default(),
            orientation: Orientation::default(),
            group_by_dir: false,
        }
    }
}

impl ExportOptions {
    /// Is this relation category shown?
    pub fn includes(&self, kind: RelationKind) -> bool {
        match kind {
            RelationKind::Missing => self.include_missing,
            RelationKind::Remote => self.include_remote,
            RelationKind::Template => self.include_templates,
        }
    }

    /// Categories shown, in output order.
    pub fn shown_kinds(&self) -> Vec<RelationKind> {
        [RelationKind::Missing, RelationKind::Remote, RelationKind::Template]
            .into_iter()
            .filter(|kind| self.includes(*kind))
            .collect()
    }

    /// Nodes in scope: every node, or only connected ones.
    pub fn scope(&self, graph: &ReferenceGraph) -> BTreeSet<PathBuf> {
        if self.show_all {
            graph.nodes()
        } else {
            graph.connected_nodes()
        }
    }
}

/// Render `graph` in the requested form.
pub fn render(
    graph: &ReferenceGraph,
    display: &DisplayPaths,
    format: OutputFormat,
    options: &ExportOptions,
) -> Result<String> {
    match format {
        OutputFormat::Ascii => Ok(render_tree(graph, display, options)),
        OutputFormat::Mermaid => Ok(to_mermaid(graph, display, options)),
        OutputFormat::Json => to_json(graph, display, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_follows_show_all() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("/r/a.yaml", "/r/b.yaml");
        graph.add_node("/r/lonely.yaml");

        let mut options = ExportOptions::default();
        assert_eq!(options.scope(&graph).len(), 2);
        options.show_all = true;
        assert_eq!(options.scope(&graph).len(), 3);
    }

    #[test]
    fn test_shown_kinds_respect_toggles() {
        let options = ExportOptions {
            include_remote: false,
            ..ExportOptions::default()
        };
        assert_eq!(
            options.shown_kinds(),
            vec![RelationKind::Missing, RelationKind::Template]
        );
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("/r/a.yaml", "/r/b.yaml");
        let display = DisplayPaths::new(std::path::Path::new("/r"), None);
        let options = ExportOptions::default();

        let mermaid = render(&graph, &display, OutputFormat::Mermaid, &options).unwrap();
        assert!(mermaid.starts_with("flowchart LR"));
        let json = render(&graph, &display, OutputFormat::Json, &options).unwrap();
        assert!(json.starts_with('{'));
        let tree = render(&graph, &display, OutputFormat::Ascii, &options).unwrap();
        assert!(tree.starts_with("a.yaml"));
    }
}
