//! Style Enforcement Tests
//!
//! Scans the workspace crates for patterns clippy does not catch.
//!
//! - `naming_conventions` - banned function prefixes and type suffixes
//! - `dead_code_enforcement` - no #[allow(dead_code)] in production code

#[path = "style/workspace_files.rs"]
mod workspace_files;

#[path = "style/naming_conventions.rs"]
mod naming_conventions;

#[path = "style/dead_code_enforcement.rs"]
mod dead_code_enforcement;
