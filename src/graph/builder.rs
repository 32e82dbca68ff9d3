//
//  builder.rs
//  Refmap
//
//  Created by hak (tharun)
//

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, trace};

use super::discovery::{discover_files, ScanOptions};
use super::engine::ReferenceGraph;
use super::types::{FileScan, Reference};
use crate::error::{RefmapError, Result};
use crate::parser::{decode_file, extract_references, is_template, DocumentFormat};
use crate::resolver::{canonical, PathResolver};

/// Build a reference graph from every matching file under `root`.
///
/// Files are decoded, classified and resolved in parallel; the results are
/// then folded into the graph one file at a time, in discovery order.
pub fn build_graph(root: &Path, options: &ScanOptions) -> Result<ReferenceGraph> {
    if !root.is_dir() {
        return Err(RefmapError::NotADirectory(root.to_path_buf()));
    }

    let resolver = PathResolver::new(root);
    let root = resolver.root();
    info!(root = %root.display(), "scanning repository");

    let files = discover_files(root, options);
    debug!(files = files.len(), "discovered files");

    let scans: Vec<FileScan> = files
        .par_iter()
        .map(|file| scan_file(&resolver, file))
        .collect();

    let mut graph = ReferenceGraph::new();
    for scan in scans {
        graph.ingest(scan);
    }

    info!(stats = %graph.stats(), "scan complete");
    Ok(graph)
}

/// Decode, classify and resolve a single file.
///
/// Never fails: an undecodable file comes back with no references.
pub fn scan_file(resolver: &PathResolver, file: &Path) -> FileScan {
    let file = canonical(file);

    let document = match decode_file(&file) {
        Ok(document) => document,
        Err(e) => {
            debug!(
                file = %file.display(),
                format = DocumentFormat::from_path(&file).name(),
                error = %e,
                "skipping undecodable file"
            );
            return FileScan::undecoded(file);
        }
    };

    let extraction = extract_references(&document);
    let mut references = Vec::with_capacity(extraction.paths.len() + extraction.urls.len());

    for candidate in extraction.paths {
        match resolver.resolve(&file, &candidate) {
            Some(target) => references.push(Reference::Resolved(target)),
            None if is_template(&candidate) => references.push(Reference::Template(candidate)),
            None => references.push(Reference::Missing(candidate)),
        }
    }

    for url in extraction.urls {
        if is_template(&url) {
            references.push(Reference::Template(url.clone()));
        }
        references.push(Reference::Remote(url));
    }

    trace!(file = %file.display(), references = references.len(), "scanned file");
    FileScan {
        file,
        decoded: true,
        references,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::RelationKind;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        fs::canonicalize(&path).unwrap()
    }

    #[test]
    fn test_build_graph_end_to_end() {
        let dir = tempdir().unwrap();
        let app = write(
            dir.path(),
            "config/app.yaml",
            "database:\n  config_file: db.yaml\nusers_file: data/users.json\n\
             extra_file: gone/nowhere.yaml\n$schema: https://json-schema.org/draft-07/schema\n\
             env_file: envs/{{ env }}.yaml\n",
        );
        let db = write(dir.path(), "config/db.yaml", "host: localhost\n");
        let users = write(dir.path(), "data/users.json", "[]");
        write(dir.path(), "lonely.toml", "name = \"x\"\n");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.targets(&app), [db, users].into_iter().collect());
        assert!(graph.missing_of(&app).contains("gone/nowhere.yaml"));
        assert!(graph.templates_of(&app).contains("envs/{{ env }}.yaml"));
        assert!(!graph.missing_of(&app).contains("envs/{{ env }}.yaml"));
        assert!(graph
            .remote_of(&app)
            .contains("https://json-schema.org/draft-07/schema"));
        assert!(graph.has_missing() && graph.has_remote() && graph.has_templates());
        assert!(graph.undecodable().is_empty());
        assert_eq!(graph.connected_nodes().len(), 3);
    }

    #[test]
    fn test_undecodable_file_stays_a_node() {
        let dir = tempdir().unwrap();
        let broken = write(dir.path(), "broken.json", "{ not json");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        assert!(graph.contains(&broken));
        assert_eq!(graph.undecodable(), [broken].into_iter().collect());
        assert_eq!(graph.stats().undecodable_count, 1);
        assert_eq!(graph.stats().edge_count, 0);
    }

    #[test]
    fn test_repeated_yaml_key_keeps_last_reference() {
        let dir = tempdir().unwrap();
        let app = write(dir.path(), "cfg/app.yaml", "include: a.yaml\ninclude: b.yaml\n");
        write(dir.path(), "cfg/a.yaml", "x: 1\n");
        let b = write(dir.path(), "cfg/b.yaml", "x: 2\n");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        assert!(graph.undecodable().is_empty());
        assert_eq!(graph.targets(&app), [b].into_iter().collect());
    }

    #[test]
    fn test_self_reference_is_dropped() {
        let dir = tempdir().unwrap();
        let me = write(dir.path(), "me.yaml", "include: me.yaml\n");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        assert!(graph.targets(&me).is_empty());
        assert!(graph.missing_of(&me).is_empty());
    }

    #[test]
    fn test_templated_url_is_remote_and_template() {
        let dir = tempdir().unwrap();
        let file = write(
            dir.path(),
            "a.yaml",
            "url: https://example.com/{{ version }}/api.json\n",
        );

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        let url = "https://example.com/{{ version }}/api.json";
        assert!(graph.remote_of(&file).contains(url));
        assert!(graph.templates_of(&file).contains(url));
    }

    #[test]
    fn test_resolved_candidates_are_never_missing() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "a/main.yaml",
            "imports:\n  - ../shared/common.yaml\n  - shared/common.yaml\n",
        );
        write(dir.path(), "shared/common.yaml", "x: 1\n");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        for (source, target) in graph.edges() {
            assert!(graph.contains(&source) && graph.contains(&target));
        }
        assert!(graph.relations(RelationKind::Missing).is_empty());
        assert_eq!(graph.stats().edge_count, 1);
    }

    #[test]
    fn test_referenced_file_outside_filter_becomes_node() {
        let dir = tempdir().unwrap();
        let app = write(dir.path(), "app.yaml", "script_path: scripts/setup.sh\n");
        let script = write(dir.path(), "scripts/setup.sh", "echo hi\n");

        let graph = build_graph(dir.path(), &ScanOptions::default()).unwrap();
        assert!(graph.contains(&script));
        assert_eq!(graph.sources_of(&script), [app].into_iter().collect());
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "file.yaml", "a: 1\n");

        let err = build_graph(&file, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, RefmapError::NotADirectory(_)));
    }
}
