//! Source file discovery shared by the style checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Prefix shared by every workspace crate directory.
const CRATE_PREFIX: &str = "tracklist-";

/// Directory holding the workspace `Cargo.toml`.
pub fn workspace_root() -> &'static Path {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(manifest_dir)
}

/// Collects the `.rs` files of every workspace crate.
///
/// Only top-level directories named `tracklist-*` are scanned, which keeps
/// vendored or reference trees next to the workspace out of the checks.
pub fn workspace_rust_files() -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(workspace_root())? {
        let path = entry?.path();
        let is_crate = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(CRATE_PREFIX));
        if path.is_dir() && is_crate {
            collect(&path, &mut files, 0)?;
        }
    }

    files.sort();
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> io::Result<()> {
    if depth > 8 {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if let Some(name) = path.file_name()
            && (name.to_string_lossy().starts_with('.') || name == "target")
        {
            continue;
        }

        if path.is_dir() {
            collect(&path, files, depth + 1)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// True for files that only hold test code.
///
/// Paths under the workspace root are judged by their components relative
/// to it, so the root's own location never affects the result.
pub fn is_test_file(path: &Path) -> bool {
    let relative = path.strip_prefix(workspace_root()).unwrap_or(path);
    let in_tests_crate = relative.starts_with("tracklist-tests");
    let in_tests_dir = relative
        .parent()
        .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == "tests"));
    let is_test_utils = relative.file_name().is_some_and(|name| name == "testing.rs");

    in_tests_crate || in_tests_dir || is_test_utils
}

/// Lines of a file up to its `#[cfg(test)]` module.
pub fn production_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(index, line)| (index + 1, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_file() {
        let root = workspace_root();

        assert!(is_test_file(&root.join("tracklist-tests/style.rs")));
        assert!(is_test_file(&root.join("tracklist-search/src/testing.rs")));
        assert!(is_test_file(&root.join("tracklist-web/tests/router.rs")));
        assert!(!is_test_file(&root.join("tracklist-search/src/scheduler.rs")));
        assert!(!is_test_file(&root.join("tracklist-web/src/server.rs")));
        assert!(!is_test_file(Path::new("tracklist-core/src/config.rs")));
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let content = "fn a() {}\n\n#[cfg(test)]\nmod tests {\n    fn get_x() {}\n}\n";
        let lines: Vec<_> = production_lines(content).collect();

        assert_eq!(lines, vec![(1, "fn a() {}"), (2, "")]);
    }

    #[test]
    fn test_finds_workspace_sources() {
        let root = workspace_root();
        let files = workspace_rust_files().unwrap();

        assert!(files.iter().any(|f| f.ends_with("tracklist-search/src/lib.rs")));
        assert!(files.iter().all(|f| f.starts_with(root)));
        assert!(
            files
                .iter()
                .all(|f| !f.strip_prefix(root).unwrap().starts_with("examples"))
        );
    }

    #[test]
    fn test_production_files_are_scanned() {
        let files = workspace_rust_files().unwrap();
        let production: Vec<_> = files.iter().filter(|f| !is_test_file(f)).collect();

        assert!(
            production
                .iter()
                .any(|f| f.ends_with("tracklist-search/src/scheduler.rs")),
            "no production sources among {} files",
            files.len()
        );
        assert!(production.iter().all(|f| !f.to_string_lossy().contains("..")));
        assert!(files.iter().any(|f| f.ends_with("tracklist-tests/style.rs")));
    }
}
