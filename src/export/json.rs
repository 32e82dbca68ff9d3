//
//  json.rs
//  Refmap
//
//  Created by hak (tharun)
//

use serde::Serialize;

use super::{DisplayPaths, ExportOptions};
use crate::error::Result;
use crate::graph::{ReferenceGraph, RelationKind};

#[derive(Debug, Serialize)]
struct JsonGraph {
    nodes: Vec<String>,
    edges: Vec<JsonEdge>,
}

#[derive(Debug, Serialize)]
struct JsonEdge {
    source: String,
    target: String,
    #[serde(skip_serializing_if = "is_false")]
    missing: bool,
    #[serde(skip_serializing_if = "is_false")]
    remote: bool,
    #[serde(skip_serializing_if = "is_false")]
    template: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl JsonEdge {
    fn new(source: String, target: String, kind: Option<RelationKind>) -> Self {
        Self {
            source,
            target,
            missing: kind == Some(RelationKind::Missing),
            remote: kind == Some(RelationKind::Remote),
            template: kind == Some(RelationKind::Template),
        }
    }
}

/// Serialize the graph as pretty-printed JSON: a list of node names plus
/// resolved edges followed by one edge per shown relation.
pub fn to_json(
    graph: &ReferenceGraph,
    display: &DisplayPaths,
    options: &ExportOptions,
) -> Result<String> {
    let nodes = options
        .scope(graph)
        .iter()
        .map(|node| display.name(node))
        .collect();

    let mut edges: Vec<JsonEdge> = graph
        .edges()
        .into_iter()
        .map(|(source, target)| JsonEdge::new(display.name(&source), display.name(&target), None))
        .collect();

    for kind in options.shown_kinds() {
        edges.extend(
            graph
                .relations(kind)
                .into_iter()
                .map(|(source, value)| JsonEdge::new(display.name(&source), value, Some(kind))),
        );
    }

    Ok(serde_json::to_string_pretty(&JsonGraph { nodes, edges })?)
}
