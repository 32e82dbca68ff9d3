//
//  mermaid.rs
//  Refmap
//
//  Created by hak (tharun)
//

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::{DisplayPaths, ExportOptions};
use crate::graph::{ReferenceGraph, RelationKind};

/// Flowchart direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Orientation {
    #[default]
    #[serde(rename = "LR", alias = "lr")]
    #[value(name = "LR", alias = "lr")]
    LeftRight,
    #[serde(rename = "TD", alias = "td")]
    #[value(name = "TD", alias = "td")]
    TopDown,
    #[serde(rename = "TB", alias = "tb")]
    #[value(name = "TB", alias = "tb")]
    TopBottom,
    #[serde(rename = "RL", alias = "rl")]
    #[value(name = "RL", alias = "rl")]
    RightLeft,
    #[serde(rename = "BT", alias = "bt")]
    #[value(name = "BT", alias = "bt")]
    BottomTop,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::TopDown => "TD",
            Self::TopBottom => "TB",
            Self::RightLeft => "RL",
            Self::BottomTop => "BT",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Styling ────────────────────────────────────────────────

struct Category {
    kind: RelationKind,
    id_prefix: &'static str,
    subgraph_id: &'static str,
    heading: &'static str,
    comment: &'static str,
    stroke: &'static str,
}

const CATEGORIES: &[Category] = &[
    Category {
        kind: RelationKind::Missing,
        id_prefix: "missing_",
        subgraph_id: "missing",
        heading: "Missing References",
        comment: "Missing references",
        stroke: "#ff0000",
    },
    Category {
        kind: RelationKind::Remote,
        id_prefix: "remote_",
        subgraph_id: "remote",
        heading: "Remote References",
        comment: "Remote references",
        stroke: "#0066cc",
    },
    Category {
        kind: RelationKind::Template,
        id_prefix: "template_",
        subgraph_id: "templates",
        heading: "Template References",
        comment: "Template references",
        stroke: "#999999",
    },
];

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\.\-]").unwrap());
static INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap());

/// Reduce any string to a Mermaid identifier: `[A-Za-z0-9_]`, letter first.
pub fn sanitize_id(value: &str) -> String {
    let replaced = SEPARATORS.replace_all(value, "_");
    let cleaned = INVALID.replace_all(&replaced, "");
    if cleaned.is_empty() {
        return "unknown".to_string();
    }
    if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned.into_owned()
    } else {
        format!("n_{}", cleaned)
    }
}

/// Labels are quoted; a literal quote would end them early.
fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Hands out identifiers, suffixing repeats so two inputs never share one.
#[derive(Default)]
struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    fn allocate(&mut self, value: &str) -> String {
        let base = sanitize_id(value);
        let mut id = base.clone();
        let mut n = 2;
        while !self.taken.insert(id.clone()) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        id
    }
}

/// Nodes and category entries with their identifiers assigned.
struct Layout {
    nodes: BTreeMap<PathBuf, String>,
    /// Per shown category: relation string -> identifier.
    relations: Vec<(&'static Category, BTreeMap<String, String>)>,
}

impl Layout {
    fn new(graph: &ReferenceGraph, display: &DisplayPaths, options: &ExportOptions) -> Self {
        let mut ids = IdAllocator::default();
        for category in CATEGORIES {
            ids.taken.insert(category.subgraph_id.to_string());
        }

        let nodes = options
            .scope(graph)
            .into_iter()
            .map(|node| {
                let key = display
                    .root_relative(&node)
                    .unwrap_or_else(|| node.clone());
                let id = ids.allocate(&key.to_string_lossy());
                (node, id)
            })
            .collect();

        let relations = CATEGORIES
            .iter()
            .filter(|c| options.includes(c.kind))
            .map(|category| {
                let values: BTreeSet<String> = graph
                    .relations(category.kind)
                    .into_iter()
                    .map(|(_, value)| value)
                    .collect();
                let map = values
                    .into_iter()
                    .map(|value| {
                        let id = ids.allocate(&format!("{}{}", category.id_prefix, value));
                        (value, id)
                    })
                    .collect();
                (category, map)
            })
            .collect();

        Self { nodes, relations }
    }
}

// ─── Rendering ──────────────────────────────────────────────

/// Render the graph as a Mermaid flowchart.
pub fn to_mermaid(
    graph: &ReferenceGraph,
    display: &DisplayPaths,
    options: &ExportOptions,
) -> String {
    let layout = Layout::new(graph, display, options);
    let mut lines = vec![format!("flowchart {}", options.orientation)];

    if options.group_by_dir {
        grouped_declarations(&layout, display, &mut lines);
    } else {
        flat_declarations(&layout, display, &mut lines);
        lines.push(String::new());
    }

    edges(graph, &layout, &mut lines);
    lines.join("\n")
}

fn node_line(indent: &str, id: &str, label: &str) -> String {
    format!("{}{}[\"{}\"]", indent, id, escape_label(label))
}

fn relation_lines(indent: &str, category: &Category, value: &str, id: &str) -> [String; 2] {
    [
        node_line(indent, id, &format!("{} {}", value, category.kind.tag())),
        format!(
            "{}style {} stroke:{},stroke-dasharray: 5 5",
            indent, id, category.stroke
        ),
    ]
}

fn flat_declarations(layout: &Layout, display: &DisplayPaths, lines: &mut Vec<String>) {
    for (node, id) in &layout.nodes {
        lines.push(node_line("    ", id, &display.name(node)));
    }

    for (category, ids) in &layout.relations {
        if ids.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("    %% {}", category.comment));
        for (value, id) in ids {
            lines.extend(relation_lines("    ", category, value, id));
        }
    }
}

/// Top-level directory a node is grouped under.
fn group_of(display: &DisplayPaths, node: &Path) -> String {
    match display.root_relative(node) {
        Some(rel) => {
            let mut components = rel.components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(first)), Some(_)) => first.to_string_lossy().into_owned(),
                _ => "root".to_string(),
            }
        }
        None => "external".to_string(),
    }
}

fn grouped_declarations(layout: &Layout, display: &DisplayPaths, lines: &mut Vec<String>) {
    let mut groups: BTreeMap<String, Vec<(&PathBuf, &String)>> = BTreeMap::new();
    for (node, id) in &layout.nodes {
        groups.entry(group_of(display, node)).or_default().push((node, id));
    }

    let mut ids = IdAllocator::default();
    for category in CATEGORIES {
        ids.taken.insert(category.subgraph_id.to_string());
    }
    ids.taken.extend(layout.nodes.values().cloned());
    for (_, map) in &layout.relations {
        ids.taken.extend(map.values().cloned());
    }

    for (name, members) in &groups {
        lines.push(format!("    subgraph {}[{}]", ids.allocate(name), name));
        for (node, id) in members {
            lines.push(node_line("        ", id, &display.name(node)));
        }
        lines.push("    end".to_string());
        lines.push(String::new());
    }

    for (category, map) in &layout.relations {
        if map.is_empty() {
            continue;
        }
        lines.push(format!("    subgraph {}[{}]", category.subgraph_id, category.heading));
        for (value, id) in map {
            lines.extend(relation_lines("        ", category, value, id));
        }
        lines.push("    end".to_string());
        lines.push(String::new());
    }
}

fn edges(graph: &ReferenceGraph, layout: &Layout, lines: &mut Vec<String>) {
    for (source, target) in graph.edges() {
        if let (Some(from), Some(to)) = (layout.nodes.get(&source), layout.nodes.get(&target)) {
            lines.push(format!("    {} --> {}", from, to));
        }
    }

    for (category, map) in &layout.relations {
        for (source, value) in graph.relations(category.kind) {
            if let (Some(from), Some(to)) = (layout.nodes.get(&source), map.get(&value)) {
                lines.push(format!("    {} -.-> {}", from, to));
            }
        }
    }
}
