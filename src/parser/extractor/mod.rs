//
//  mod.rs
//  Refmap
//
//  Created by hak (tharun)
//

mod command;
mod paths;
mod urls;

use std::collections::BTreeSet;

use super::document::Document;

pub use command::{is_command_with_path_target, PATH_COMMANDS};
pub use paths::{clean_path, is_likely_path, MAX_CANDIDATE_LEN};
pub use urls::{is_url, is_url_key, URL_KEY_HINTS};

/// Key fragments that mark everything beneath them as path-bearing.
pub const PATH_KEY_HINTS: &[&str] = &[
    "path", "file", "import", "include", "source", "src", "config", "schema", "template",
    "input", "output", "dir", "directory", "extends", "inherits", "base", "ref", "reference",
    "$ref",
];

/// Reference-shaped strings pulled out of one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Cleaned path candidates, not yet resolved.
    pub paths: BTreeSet<String>,
    /// HTTP(S) URLs.
    pub urls: BTreeSet<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.urls.is_empty()
    }
}

/// Does the (lower-cased) key hint at a path-valued subtree?
pub fn is_path_key(key: &str) -> bool {
    PATH_KEY_HINTS.iter().any(|hint| key.contains(hint))
}

/// `{{ ` followed later by ` }}`: an unrendered placeholder.
pub fn is_template(value: &str) -> bool {
    value
        .find("{{ ")
        .is_some_and(|start| value[start + 3..].contains(" }}"))
}

/// Extract every path candidate and URL from a document.
pub fn extract_references(document: &Document) -> Extraction {
    classify(document, None)
}

/// Classify a subtree that sits under `key_hint` (if any).
///
/// The hint behaves like an ancestor key: it feeds the URL key test and, if
/// path-like, turns on relaxed path detection for the whole subtree.
pub fn classify(document: &Document, key_hint: Option<&str>) -> Extraction {
    let key = key_hint.map(str::to_lowercase);
    let aggressive = key.as_deref().is_some_and(is_path_key);
    let mut out = Extraction::default();
    walk(document, key.as_deref(), aggressive, &mut out);
    out
}

fn walk(node: &Document, key: Option<&str>, aggressive: bool, out: &mut Extraction) {
    match node {
        Document::Map(pairs) => {
            for (child_key, value) in pairs {
                let child_key = child_key.to_lowercase();
                let child_aggressive = aggressive || is_path_key(&child_key);
                walk(value, Some(child_key.as_str()), child_aggressive, out);
            }
        }
        Document::Sequence(items) => {
            for item in items {
                walk(item, key, aggressive, out);
            }
        }
        Document::String(value) => {
            if is_likely_path(value, aggressive) {
                if let Some(cleaned) = clean_path(value) {
                    out.paths.insert(cleaned);
                }
            }
            if is_url(value, key) {
                out.urls.insert(value.clone());
            }
        }
        Document::Integer(_) | Document::Float(_) | Document::Bool(_) | Document::Null => {}
    }
}
