use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use envscope_config::EnvscopeConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::discovery::{discover_bundles, scan_mtimes, split_roots};
use super::errors::BundleError;
use crate::env::Environment;
use crate::targets::TargetDefinition;

/// File holding the discovered bundle paths.
pub const BUNDLES_FILE: &str = "local_bundles.json";

/// Sidecar used for staleness detection.
pub const META_FILE: &str = "local_bundles_meta.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlesFile {
    pub bundles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BundlesMeta {
    bndl_roots: String,
    depth2_mtimes: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,
}

/// The bundle cache in one directory.
#[derive(Debug, Clone)]
pub struct BundleCache {
    dir: PathBuf,
}

impl BundleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bundles_path(&self) -> PathBuf {
        self.dir.join(BUNDLES_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Whether the cache must be regenerated for the raw `roots` value.
    ///
    /// Stale when either file is missing, the sidecar is unreadable, the roots
    /// value changed, or the two-level mtime scan differs from the recorded one.
    pub fn is_stale(&self, roots: &str) -> bool {
        let bundles_path = self.bundles_path();
        let meta_path = self.meta_path();
        if !bundles_path.exists() || !meta_path.exists() {
            return true;
        }

        let meta: BundlesMeta = match std::fs::read_to_string(&meta_path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
        {
            Some(meta) => meta,
            None => {
                debug!(
                    event = "core.bundles.meta_unreadable",
                    path = %meta_path.display()
                );
                return true;
            }
        };

        if meta.bndl_roots != roots {
            debug!(event = "core.bundles.stale", reason = "roots_changed");
            return true;
        }

        if scan_mtimes(&split_roots(roots)) != meta.depth2_mtimes {
            debug!(event = "core.bundles.stale", reason = "layout_changed");
            return true;
        }

        false
    }

    /// Discover bundles under `roots` and write the cache, unless it is
    /// already current. `force` skips the staleness check.
    ///
    /// Returns the path of the bundles file.
    pub fn refresh(&self, roots: &str, force: bool) -> Result<PathBuf, BundleError> {
        let bundles_path = self.bundles_path();

        if !force && !self.is_stale(roots) {
            debug!(
                event = "core.bundles.cache_current",
                path = %bundles_path.display()
            );
            return Ok(bundles_path);
        }

        let root_paths = split_roots(roots);
        let bundles = discover_bundles(&root_paths);

        std::fs::create_dir_all(&self.dir).map_err(|source| BundleError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let file = BundlesFile {
            bundles: bundles.iter().map(|b| b.display().to_string()).collect(),
        };
        write_json(&bundles_path, &file)?;

        info!(
            event = "core.bundles.cache_written",
            path = %bundles_path.display(),
            count = file.bundles.len()
        );

        let meta = BundlesMeta {
            bndl_roots: roots.to_string(),
            depth2_mtimes: scan_mtimes(&root_paths),
            generated_at: Some(Utc::now()),
        };
        write_json(&self.meta_path(), &meta)?;

        Ok(bundles_path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BundleError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| BundleError::Serialize {
        message: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `<local data dir>/gt/envoy`, located through `env`.
///
/// Uses `LOCALAPPDATA`, then `XDG_DATA_HOME`, then `HOME/.local/share`, then
/// the platform default.
pub fn default_cache_dir(env: &Environment) -> Option<PathBuf> {
    let non_empty = |name: &str| env.get(name).filter(|v| !v.trim().is_empty());

    let base = non_empty("LOCALAPPDATA")
        .map(PathBuf::from)
        .or_else(|| non_empty("XDG_DATA_HOME").map(PathBuf::from))
        .or_else(|| non_empty("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .or_else(dirs::data_local_dir)?;

    Some(base.join("gt").join("envoy"))
}

/// Refresh the bundle cache for `target` and return the file to advertise.
///
/// Returns `None` when the target does not use bundles or the cache cannot be
/// written; the launch goes ahead without the variable in that case.
pub fn prepare_bundles(
    config: &EnvscopeConfig,
    target: &TargetDefinition,
    env: &Environment,
    force: bool,
) -> Option<PathBuf> {
    if !target.bundles() {
        return None;
    }

    let dir = match config.bundles.cache_dir() {
        Some(dir) => Some(dir.clone()),
        None => default_cache_dir(env),
    };
    let Some(dir) = dir else {
        warn!(
            event = "core.bundles.prepare_failed",
            target = target.name(),
            error = %BundleError::NoCacheDir
        );
        return None;
    };

    let roots = env.get(config.bundles.roots_var()).unwrap_or("");
    match BundleCache::new(dir).refresh(roots, force) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(
                event = "core.bundles.prepare_failed",
                target = target.name(),
                error = %e
            );
            None
        }
    }
}
