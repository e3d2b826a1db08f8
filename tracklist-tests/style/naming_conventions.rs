//! Naming Convention Checker
//!
//! Bans accessor-style function prefixes and role suffixes on type names.

use std::fs;
use std::path::Path;

use crate::workspace_files::{is_test_file, production_lines, workspace_rust_files};

const BANNED_FUNCTION_PREFIXES: [(&str, &str); 3] = [
    ("get_", "Use the noun directly: request.url() not request.get_url()"),
    ("set_", "Use a descriptive verb or a builder method"),
    ("handle_", "Be specific: resolve() not handle_request()"),
];

const BANNED_TYPE_SUFFIXES: [(&str, &str); 4] = [
    ("Manager", "Name what it IS, not its role"),
    ("Service", "Usually adds no semantic value"),
    ("Helper", "Name what it does"),
    ("Factory", "Use a builder or a plain new() function"),
];

#[derive(Debug)]
struct NamingViolation {
    location: String,
    message: String,
}

fn function_name(line: &str) -> Option<&str> {
    let after_fn = line.trim().split_once("fn ")?.1;
    let prefix = line.trim().split_once("fn ")?.0;
    let is_definition = prefix
        .split_whitespace()
        .all(|word| matches!(word, "pub" | "pub(crate)" | "async" | "const" | "unsafe"));
    is_definition.then(|| after_fn.split(['(', '<']).next().unwrap_or_default())
}

fn type_name(line: &str) -> Option<&str> {
    let mut words = line.trim().split_whitespace().skip_while(|w| w.starts_with("pub"));
    match words.next()? {
        "struct" | "enum" | "trait" => words
            .next()
            .map(|name| name.split(['<', '{', '(', ';']).next().unwrap_or_default()),
        _ => None,
    }
}

fn scan(path: &Path, content: &str) -> Vec<NamingViolation> {
    let mut violations = Vec::new();

    for (line_number, line) in production_lines(content) {
        if line.trim_start().starts_with("//") {
            continue;
        }
        let location = format!("{}:{}", path.display(), line_number);

        if let Some(name) = function_name(line) {
            for (prefix, advice) in BANNED_FUNCTION_PREFIXES {
                if name.starts_with(prefix) {
                    violations.push(NamingViolation {
                        location: location.clone(),
                        message: format!("fn {name}: banned prefix '{prefix}'. {advice}"),
                    });
                }
            }
        }

        if let Some(name) = type_name(line) {
            for (suffix, advice) in BANNED_TYPE_SUFFIXES {
                if name.ends_with(suffix) {
                    violations.push(NamingViolation {
                        location: location.clone(),
                        message: format!("type {name}: banned suffix '{suffix}'. {advice}"),
                    });
                }
            }
        }
    }

    violations
}

#[test]
fn test_detects_banned_names() {
    let content = "\
pub fn get_limit(&self) -> u32 { 0 }
pub async fn handle_request() {}
fn limit() -> u32 { 0 }
pub struct ProviderManager;
pub(crate) enum SearchService {}
struct Query;
// fn get_commented_out() {}
let get_x = |x| x;
";

    let violations = scan(Path::new("src/lib.rs"), content);
    let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();

    assert_eq!(violations.len(), 4, "{messages:?}");
    assert!(messages[0].starts_with("fn get_limit"));
    assert!(messages[1].starts_with("fn handle_request"));
    assert!(messages[2].starts_with("type ProviderManager"));
    assert!(messages[3].starts_with("type SearchService"));
}

#[test]
fn naming_conventions() {
    let mut violations = Vec::new();

    for path in workspace_rust_files().expect("Failed to scan workspace") {
        if is_test_file(&path) {
            continue;
        }
        let content = fs::read_to_string(&path).expect("Failed to read source file");
        violations.extend(scan(&path, &content));
    }

    assert!(
        violations.is_empty(),
        "naming violations:\n{}",
        violations
            .iter()
            .map(|v| format!("  {}  {}", v.location, v.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
