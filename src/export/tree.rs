//
//  tree.rs
//  Refmap
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{DisplayPaths, ExportOptions};
use crate::graph::ReferenceGraph;

/// Appended to a node that already sits on the current root-to-leaf path.
pub const CYCLE_MARKER: &str = " [*]";

/// Connector glyphs for the tree form.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// Unicode box drawing.
    #[default]
    Tree,
    /// Plain ASCII.
    Ascii,
}

struct Glyphs {
    branch: &'static str,
    last: &'static str,
    vertical: &'static str,
    space: &'static str,
}

impl TreeStyle {
    fn glyphs(self) -> Glyphs {
        match self {
            Self::Tree => Glyphs {
                branch: "├── ",
                last: "└── ",
                vertical: "│   ",
                space: "    ",
            },
            Self::Ascii => Glyphs {
                branch: "|-- ",
                last: "\\-- ",
                vertical: "|   ",
                space: "    ",
            },
        }
    }
}

/// Render the graph as one indented tree per root, separated by blank lines.
pub fn render_tree(
    graph: &ReferenceGraph,
    display: &DisplayPaths,
    options: &ExportOptions,
) -> String {
    let scope = options.scope(graph);
    let mut renderer = TreeRenderer {
        graph,
        display,
        options,
        glyphs: options.tree_style.glyphs(),
        open: BTreeSet::new(),
        lines: Vec::new(),
    };

    for (i, root) in select_roots(graph, &scope).iter().enumerate() {
        if i > 0 {
            renderer.lines.push(String::new());
        }
        renderer.render_root(root);
    }
    renderer.lines.join("\n")
}

/// Scope nodes no scope node points at. Falls back to scope nodes with
/// outgoing edges, then to the whole scope.
fn select_roots(graph: &ReferenceGraph, scope: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let targets: BTreeSet<PathBuf> = scope.iter().flat_map(|n| graph.targets(n)).collect();

    let roots: Vec<PathBuf> = scope.difference(&targets).cloned().collect();
    if !roots.is_empty() {
        return roots;
    }

    let with_edges: Vec<PathBuf> = scope
        .iter()
        .filter(|n| !graph.targets(n).is_empty())
        .cloned()
        .collect();
    if !with_edges.is_empty() {
        return with_edges;
    }

    scope.iter().cloned().collect()
}

/// One child line under a node.
enum Item {
    Node(PathBuf),
    Leaf(String),
}

struct TreeRenderer<'a> {
    graph: &'a ReferenceGraph,
    display: &'a DisplayPaths,
    options: &'a ExportOptions,
    glyphs: Glyphs,
    /// Nodes on the path from the current root down to the current node.
    open: BTreeSet<PathBuf>,
    lines: Vec<String>,
}

impl TreeRenderer<'_> {
    fn render_root(&mut self, node: &Path) {
        self.lines.push(self.display.name(node));
        self.open.insert(node.to_path_buf());
        self.render_children(node, "");
        self.open.remove(node);
    }

    fn render_node(&mut self, node: &Path, prefix: &str, is_last: bool) {
        let connector = if is_last { self.glyphs.last } else { self.glyphs.branch };
        let name = self.display.name(node);

        if self.open.contains(node) {
            self.lines.push(format!("{}{}{}{}", prefix, connector, name, CYCLE_MARKER));
            return;
        }
        self.lines.push(format!("{prefix}{connector}{name}"));

        let pad = if is_last { self.glyphs.space } else { self.glyphs.vertical };
        let child_prefix = format!("{prefix}{pad}");

        self.open.insert(node.to_path_buf());
        self.render_children(node, &child_prefix);
        self.open.remove(node);
    }

    fn render_children(&mut self, node: &Path, prefix: &str) {
        let items = self.items(node);
        let total = items.len();

        for (i, item) in items.into_iter().enumerate() {
            let is_last = i + 1 == total;
            match item {
                Item::Node(child) => self.render_node(&child, prefix, is_last),
                Item::Leaf(text) => {
                    let connector = if is_last { self.glyphs.last } else { self.glyphs.branch };
                    self.lines.push(format!("{prefix}{connector}{text}"));
                }
            }
        }
    }

    /// Resolved children, then each shown relation category, each sorted.
    fn items(&self, node: &Path) -> Vec<Item> {
        let mut items: Vec<Item> = self.graph.targets(node).into_iter().map(Item::Node).collect();
        for kind in self.options.shown_kinds() {
            items.extend(
                self.graph
                    .relations_of(node, kind)
                    .into_iter()
                    .map(|value| Item::Leaf(format!("{} {}", value, kind.tag()))),
            );
        }
        items
    }
}
