//! Dead Code Enforcement
//!
//! Production code must not silence the dead code lint. Test files and
//! `#[cfg(test)]` modules are exempt.

use std::fs;
use std::path::Path;

use crate::workspace_files::{is_test_file, production_lines, workspace_rust_files};

#[derive(Debug)]
struct DeadCodeViolation {
    file_path: String,
    line_number: usize,
    context: String,
}

fn allows_dead_code(line: &str) -> bool {
    let trimmed = line.trim();
    (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
        && trimmed.contains("dead_code")
}

fn scan(path: &Path, content: &str) -> Vec<DeadCodeViolation> {
    production_lines(content)
        .filter(|(_, line)| allows_dead_code(line))
        .map(|(line_number, line)| DeadCodeViolation {
            file_path: path.display().to_string(),
            line_number,
            context: line.trim().to_string(),
        })
        .collect()
}

#[test]
fn test_dead_code_detection() {
    let content = r#"
use std::collections::HashMap;

#[allow(dead_code)]
struct UnusedStruct {
    field: u32,
}

#[allow(clippy::missing_docs_in_private_items, dead_code)]
fn unused_function() {}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    fn fixture() {}
}
"#;

    let violations = scan(Path::new("src/lib.rs"), content);

    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].line_number, 4);
    assert_eq!(violations[1].line_number, 9);
}

#[test]
fn dead_code_enforcement() {
    let mut violations = Vec::new();
    let mut files_checked = 0;

    for path in workspace_rust_files().expect("Failed to scan workspace") {
        if is_test_file(&path) {
            continue;
        }
        let content = fs::read_to_string(&path).expect("Failed to read source file");
        files_checked += 1;
        violations.extend(scan(&path, &content));
    }

    assert!(files_checked > 0, "no production files found");
    assert!(
        violations.is_empty(),
        "#[allow(dead_code)] in production code ({} of {} files checked):\n{}",
        violations.len(),
        files_checked,
        violations
            .iter()
            .map(|v| format!("  {}:{}  {}", v.file_path, v.line_number, v.context))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
