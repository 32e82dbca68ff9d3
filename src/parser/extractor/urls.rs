//
//  urls.rs
//  Refmap
//
//  Created by hak (tharun)
//

use once_cell::sync::Lazy;
use regex::Regex;

use super::paths::MAX_CANDIDATE_LEN;

/// Keys whose URL values are always references.
pub const URL_KEY_HINTS: &[&str] = &[
    "$schema", "schema", "$ref", "ref", "url", "uri", "href", "link", "homepage", "repository",
    "source",
];

pub(crate) static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// URLs worth keeping even under an unremarkable key.
static SCHEMA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)json-schema\.org|schema\.|/schema|\.xsd$|\.dtd$").unwrap()
});

/// Does the (lower-cased) key hint at a URL-valued reference?
pub fn is_url_key(key: &str) -> bool {
    URL_KEY_HINTS.iter().any(|hint| key.contains(hint))
}

/// Decide whether a scalar is a remote reference worth tracking.
pub fn is_url(value: &str, key: Option<&str>) -> bool {
    if value.is_empty() || value.chars().count() > MAX_CANDIDATE_LEN {
        return false;
    }
    if !HTTP_URL.is_match(value) {
        return false;
    }
    if key.is_some_and(is_url_key) {
        return true;
    }
    SCHEMA_URL.is_match(value)
}
