use std::sync::LazyLock;

use envscope_config::EnvscopeConfig;
use tracing::{debug, warn};

use super::backends::VSCodeBackend;
use super::errors::TargetError;
use super::traits::TargetBackend;
use super::types::TargetDefinition;
use crate::env::Environment;

/// Targets that exist without any config file.
static BUILTINS: LazyLock<Vec<Box<dyn TargetBackend>>> =
    LazyLock::new(|| vec![Box::new(VSCodeBackend)]);

fn builtin(name: &str) -> Option<&'static dyn TargetBackend> {
    BUILTINS
        .iter()
        .find(|b| b.name() == name || b.aliases().contains(&name))
        .map(|b| b.as_ref())
}

/// Registered targets: the built-ins overlaid with `[targets.*]` tables.
pub struct TargetRegistry<'a> {
    config: &'a EnvscopeConfig,
}

impl<'a> TargetRegistry<'a> {
    pub fn new(config: &'a EnvscopeConfig) -> Self {
        Self { config }
    }

    /// All registered target names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTINS.iter().map(|b| b.name().to_string()).collect();
        names.extend(self.config.targets.keys().cloned());
        names.sort();
        names.dedup();
        names
    }

    /// Look up a target by name or alias.
    ///
    /// A config table keyed by an alias applies to the built-in it aliases.
    /// Built-in definitions may depend on `env` (install locations).
    pub fn lookup(&self, name: &str, env: &Environment) -> Result<TargetDefinition, TargetError> {
        let name = name.trim();
        if name.is_empty() {
            warn!(event = "core.targets.lookup_empty_name");
            return Err(self.unknown(name));
        }

        let definition = match builtin(name) {
            Some(backend) => {
                debug!(
                    event = "core.targets.lookup_builtin",
                    name = name,
                    display_name = backend.display_name()
                );
                let mut def = backend.default_definition(env);
                for key in std::iter::once(backend.name()).chain(backend.aliases().iter().copied()) {
                    if let Some(overrides) = self.config.target(key) {
                        def = def.apply_config(overrides);
                    }
                }
                def
            }
            None => match self.config.target(name) {
                Some(target) => TargetDefinition::new(name, name).apply_config(target),
                None => {
                    warn!(event = "core.targets.lookup_unknown", name = name);
                    return Err(self.unknown(name));
                }
            },
        };

        debug!(
            event = "core.targets.lookup_completed",
            name = name,
            target = definition.name(),
            executable = definition.executable()
        );

        Ok(definition)
    }

    fn unknown(&self, name: &str) -> TargetError {
        TargetError::UnknownTarget {
            name: name.to_string(),
            known: self.names().join(", "),
        }
    }
}
