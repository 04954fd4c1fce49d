//! Script-relative path resolution
//!
//! Turns the path lists scripts hand us into fully-qualified form against a
//! scope's source directory. Already-absolute entries and entries that open
//! with a generator expression pass through untouched; those are someone
//! else's problem to evaluate.

use crate::genex;
use bld_platform::is_full_path;
use std::path::{Path, PathBuf};

fn resolve_one(path: &str, source_dir: &Path) -> String {
    if is_full_path(path) || genex::starts_with(path) {
        path.to_string()
    } else {
        format!("{}/{}", source_dir.display(), path)
    }
}

/// Resolve a path list into the `;`-joined wire format
pub fn resolve_paths<S: AsRef<str>>(paths: &[S], source_dir: &Path) -> String {
    paths
        .iter()
        .map(|p| resolve_one(p.as_ref(), source_dir))
        .collect::<Vec<_>>()
        .join(";")
}

/// Resolve a source-file list to fully-qualified paths, one per entry
pub fn resolve_sources<S: AsRef<str>>(paths: &[S], source_dir: &Path) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| PathBuf::from(resolve_one(p.as_ref(), source_dir)))
        .collect()
}
