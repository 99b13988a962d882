//! Pre-generated list of envoy bundles handed to the launched editor.
//!
//! Scanning every bundle root on each launch is slow, so the intermediary
//! writes the discovered bundle paths to `local_bundles.json` and points the
//! target at it. The scan is repeated only when the cache is stale.

pub mod cache;
pub mod discovery;
pub mod errors;

pub use cache::{BundleCache, default_cache_dir, prepare_bundles};
pub use discovery::{BUNDLE_MARKER_DIR, discover_bundles, scan_mtimes, split_roots};
pub use errors::BundleError;

/// Variables consulted when locating the default cache directory.
pub const BUNDLE_LOCATION_VARS: &[&str] = &["LOCALAPPDATA", "XDG_DATA_HOME", "HOME"];
