//
//  paths.rs
//  Refmap
//
//  Created by hak (tharun)
//

use once_cell::sync::Lazy;
use regex::Regex;

use super::command::is_command_with_path_target;
use super::urls::HTTP_URL;

/// Candidates longer than this are never treated as paths.
pub const MAX_CANDIDATE_LEN: usize = 500;

/// Endings accepted without further evidence once a key hinted at a path.
const CONFIG_SUFFIXES: &[&str] = &[".yaml", ".yml", ".json", ".toml", ".xml", ".ini", ".cfg"];

/// Leading characters of values that are expressions, not paths.
const NON_PATH_PREFIXES: &[char] = &['$', '{', '[', '(', '#', '@'];

/// System locations that are never part of a scanned repository.
const SYSTEM_PREFIXES: &[&str] = &["/etc/", "/usr/", "/var/"];

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w{1,10}$").unwrap());

static CONFIG_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w./\-_]+\.(ya?ml|json|toml|xml|ini|cfg|conf|config)$").unwrap()
});

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

/// Decide whether a scalar looks like a file path.
///
/// `aggressive` is set when some ancestor key hinted at a path; it relaxes
/// the test to "has a separator or a config suffix".
pub fn is_likely_path(value: &str, aggressive: bool) -> bool {
    if value.is_empty() || value.chars().count() > MAX_CANDIDATE_LEN {
        return false;
    }
    if HTTP_URL.is_match(value) {
        return false;
    }
    if value.starts_with(NON_PATH_PREFIXES) {
        return false;
    }
    if value.contains('\n') || value.contains('\t') {
        return false;
    }
    if is_command_with_path_target(value) {
        return false;
    }

    if aggressive {
        return has_separator(value) || CONFIG_SUFFIXES.iter().any(|s| value.ends_with(s));
    }

    EXTENSION.is_match(value) && (has_separator(value) || CONFIG_FILE_NAME.is_match(value))
}

/// Normalize a candidate; `None` means it should be dropped.
pub fn clean_path(value: &str) -> Option<String> {
    let cleaned = value.trim().trim_matches(|c| c == '\'' || c == '"');

    // JSON pointer into the same document
    if cleaned.starts_with("#/") {
        return None;
    }

    let cleaned = cleaned.strip_prefix("./").unwrap_or(cleaned).replace('\\', "/");

    if SYSTEM_PREFIXES.iter().any(|p| cleaned.starts_with(p)) {
        return None;
    }
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relaxed_mode_needs_separator_or_suffix() {
        assert!(is_likely_path("config/app", true));
        assert!(is_likely_path("base.yaml", true));
        assert!(is_likely_path("dir\\file", true));
        assert!(!is_likely_path("plainword", true));
        assert!(!is_likely_path("notes.md", true));
    }

    #[test]
    fn test_strict_mode_needs_extension() {
        assert!(is_likely_path("config/app.yaml", false));
        assert!(is_likely_path("scripts/run.sh", false));
        assert!(is_likely_path("settings.json", false));
        assert!(is_likely_path("nginx.CONF", false));
        // extension but no separator and not a config name
        assert!(!is_likely_path("readme.md", false));
        // separator but no extension
        assert!(!is_likely_path("config/app", false));
        assert!(!is_likely_path("1.5", false));
    }

    #[test]
    fn test_rejections() {
        assert!(!is_likely_path("", true));
        assert!(!is_likely_path("https://example.com/a.json", true));
        assert!(!is_likely_path("HTTP://example.com/a.json", true));
        assert!(!is_likely_path("${HOME}/x.yaml", true));
        assert!(!is_likely_path("{{ env }}/x.yaml", true));
        assert!(!is_likely_path("#/definitions/a", true));
        assert!(!is_likely_path("@scope/pkg.json", true));
        assert!(!is_likely_path("a/b.yaml\nc/d.yaml", true));
        assert!(!is_likely_path("a/b.yaml\tc", true));
        assert!(!is_likely_path("chmod 600 /test/permissions.yaml", true));
        let long = format!("{}.yaml", "a/".repeat(300));
        assert!(!is_likely_path(&long, true));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("  './config/app.yaml' "), Some("config/app.yaml".to_string()));
        assert_eq!(clean_path("dir\\sub\\file.json"), Some("dir/sub/file.json".to_string()));
        assert_eq!(clean_path("../shared/x.yaml"), Some("../shared/x.yaml".to_string()));
        assert_eq!(clean_path("#/components/schemas/User"), None);
        assert_eq!(clean_path("/etc/nginx/nginx.conf"), None);
        assert_eq!(clean_path("/usr/share/x.json"), None);
        assert_eq!(clean_path("/var/lib/x.json"), None);
        assert_eq!(clean_path("\"\""), None);
        assert_eq!(clean_path("/data/x.json"), Some("/data/x.json".to_string()));
    }
}
