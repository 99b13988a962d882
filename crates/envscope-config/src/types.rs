use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Variables the intermediary receives when the caller does not inherit.
pub const DEFAULT_INTERMEDIARY_ENV: &[&str] = &["PATH", "HOME"];

/// Variable holding the path list of bundle roots to scan.
pub const DEFAULT_BUNDLE_ROOTS_VAR: &str = "ENVOY_BNDL_ROOTS";

/// Variable injected into the target environment, pointing at the bundle cache file.
pub const DEFAULT_BUNDLES_CONFIG_VAR: &str = "ENVOY_BUNDLES_CONFIG";

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvscopeConfig {
    #[serde(default)]
    pub launcher: LauncherConfig,
    #[serde(default)]
    pub bundles: BundlesConfig,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl EnvscopeConfig {
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    intermediary_env: Option<Vec<String>>,
    intermediary: Option<Vec<String>>,
}

impl LauncherConfig {
    /// Names copied from the caller into a scoped intermediary environment.
    pub fn intermediary_env(&self) -> Vec<String> {
        match &self.intermediary_env {
            Some(names) => names.clone(),
            None => DEFAULT_INTERMEDIARY_ENV
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Explicit intermediary command line, if configured.
    pub fn intermediary(&self) -> Option<&[String]> {
        self.intermediary.as_deref()
    }

    pub(crate) fn raw_intermediary_env(&self) -> Option<&[String]> {
        self.intermediary_env.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundlesConfig {
    roots_var: Option<String>,
    config_var: Option<String>,
    cache_dir: Option<PathBuf>,
}

impl BundlesConfig {
    pub fn roots_var(&self) -> &str {
        self.roots_var.as_deref().unwrap_or(DEFAULT_BUNDLE_ROOTS_VAR)
    }

    pub fn config_var(&self) -> &str {
        self.config_var
            .as_deref()
            .unwrap_or(DEFAULT_BUNDLES_CONFIG_VAR)
    }

    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }
}

/// A `[targets.<name>]` table.
///
/// Every field is optional so the same table can either describe a new
/// target or override fields of a built-in one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub executable: Option<String>,
    pub executable_var: Option<String>,
    pub fallback_paths: Option<Vec<PathBuf>>,
    pub bundles: Option<bool>,
    pub wait: Option<bool>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// The scoped environment of a final target.
///
/// `pass` names are copied from the intermediary's environment when present;
/// `set` entries are literal values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub pass: Vec<String>,
    #[serde(default)]
    pub set: BTreeMap<String, String>,
}
