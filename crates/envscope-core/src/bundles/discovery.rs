use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::debug;

/// Directory whose presence marks a bundle.
pub const BUNDLE_MARKER_DIR: &str = "envoy_env";

const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Split a path-list value into roots, trimming blanks.
pub fn split_roots(roots: &str) -> Vec<PathBuf> {
    roots
        .split(PATH_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Find bundles under `roots`: each root itself, or any immediate child
/// directory, that contains an `envoy_env/` directory. Sorted, no duplicates.
pub fn discover_bundles(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut bundles = Vec::new();

    for root in roots {
        if !root.is_dir() {
            debug!(event = "core.bundles.root_missing", root = %root.display());
            continue;
        }

        if is_bundle(root) {
            bundles.push(root.clone());
        }

        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    event = "core.bundles.root_unreadable",
                    root = %root.display(),
                    error = %e
                );
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && is_bundle(&path) {
                bundles.push(path);
            }
        }
    }

    bundles.sort();
    bundles.dedup();
    bundles
}

fn is_bundle(dir: &Path) -> bool {
    dir.join(BUNDLE_MARKER_DIR).is_dir()
}

/// Modification times (nanoseconds since the epoch) of each root and its
/// immediate child directories.
///
/// Two levels catch a bundle cloned or removed under a root (the root's
/// mtime changes) and `envoy_env/` appearing or disappearing in a bundle
/// (the bundle directory's mtime changes).
pub fn scan_mtimes(roots: &[PathBuf]) -> BTreeMap<String, u64> {
    let mut mtimes = BTreeMap::new();

    for root in roots {
        if !root.is_dir() {
            continue;
        }
        if let Some(mtime) = mtime_nanos(root) {
            mtimes.insert(root.display().to_string(), mtime);
        }
        let Ok(entries) = std::fs::read_dir(root) else {
            debug!(event = "core.bundles.stat_failed", root = %root.display());
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir()
                && let Some(mtime) = mtime_nanos(&path)
            {
                mtimes.insert(path.display().to_string(), mtime);
            }
        }
    }

    mtimes
}

fn mtime_nanos(path: &Path) -> Option<u64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let nanos = modified.duration_since(UNIX_EPOCH).ok()?.as_nanos();
    u64::try_from(nanos).ok()
}
