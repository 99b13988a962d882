//! Config validation.
//!
//! Variable names are checked up front so that a typo in the config file is
//! reported before any process is started.

use tracing::debug;

use crate::errors::ConfigError;
use crate::types::EnvscopeConfig;

/// Whether `name` is a portable environment variable name: non-empty, ASCII
/// alphanumerics and underscores only, not starting with a digit.
pub fn is_valid_env_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn check_name(name: &str, context: &str) -> Result<(), ConfigError> {
    if is_valid_env_name(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidConfiguration {
            message: format!("invalid environment variable name {:?} in {}", name, context),
        })
    }
}

pub fn validate_config(config: &EnvscopeConfig) -> Result<(), ConfigError> {
    if let Some(names) = config.launcher.raw_intermediary_env() {
        for name in names {
            check_name(name, "launcher.intermediary_env")?;
        }
    }

    if let Some(command) = config.launcher.intermediary()
        && command.first().is_none_or(|program| program.trim().is_empty())
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "launcher.intermediary must name a program".to_string(),
        });
    }

    check_name(config.bundles.roots_var(), "bundles.roots_var")?;
    check_name(config.bundles.config_var(), "bundles.config_var")?;

    for (target_name, target) in &config.targets {
        if target_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfiguration {
                message: "target names must not be empty".to_string(),
            });
        }

        let context = format!("targets.{}", target_name);

        if let Some(executable) = &target.executable
            && executable.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("{}.executable must not be empty", context),
            });
        }

        if let Some(var) = &target.executable_var {
            check_name(var, &format!("{}.executable_var", context))?;
        }

        for name in &target.environment.pass {
            check_name(name, &format!("{}.environment.pass", context))?;
        }

        for name in target.environment.set.keys() {
            check_name(name, &format!("{}.environment.set", context))?;
        }
    }

    debug!(
        event = "config.validation_completed",
        targets = config.targets.len()
    );

    Ok(())
}
