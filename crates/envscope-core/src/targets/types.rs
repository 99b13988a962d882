use std::collections::BTreeMap;
use std::path::PathBuf;

use envscope_config::TargetConfig;

/// Everything needed to find and launch one final target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDefinition {
    name: String,
    executable: String,
    executable_var: Option<String>,
    fallback_paths: Vec<PathBuf>,
    bundles: bool,
    wait: bool,
    pass: Vec<String>,
    set: BTreeMap<String, String>,
}

impl TargetDefinition {
    /// A definition with no environment, no fallbacks, and a blocking wait.
    pub fn new(name: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executable: executable.into(),
            executable_var: None,
            fallback_paths: Vec::new(),
            bundles: false,
            wait: true,
            pass: Vec::new(),
            set: BTreeMap::new(),
        }
    }

    pub fn with_executable_var(mut self, var: impl Into<String>) -> Self {
        self.executable_var = Some(var.into());
        self
    }

    pub fn with_fallback_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.fallback_paths = paths;
        self
    }

    pub fn with_bundles(mut self, bundles: bool) -> Self {
        self.bundles = bundles;
        self
    }

    /// Overlay a `[targets.<name>]` table. Present fields replace the
    /// current ones; `environment.set` entries are merged in.
    pub fn apply_config(mut self, config: &TargetConfig) -> Self {
        if let Some(executable) = &config.executable {
            self.executable = executable.clone();
        }
        if let Some(var) = &config.executable_var {
            self.executable_var = Some(var.clone());
        }
        if let Some(paths) = &config.fallback_paths {
            self.fallback_paths = paths.clone();
        }
        if let Some(bundles) = config.bundles {
            self.bundles = bundles;
        }
        if let Some(wait) = config.wait {
            self.wait = wait;
        }
        if !config.environment.pass.is_empty() {
            self.pass = config.environment.pass.clone();
        }
        self.set.extend(
            config
                .environment
                .set
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn executable_var(&self) -> Option<&str> {
        self.executable_var.as_deref()
    }

    pub fn fallback_paths(&self) -> &[PathBuf] {
        &self.fallback_paths
    }

    pub fn bundles(&self) -> bool {
        self.bundles
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    /// Names copied from the intermediary's environment into the target's.
    pub fn pass(&self) -> &[String] {
        &self.pass
    }

    /// Literal values placed in the target's environment.
    pub fn set(&self) -> &BTreeMap<String, String> {
        &self.set
    }
}
