use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::types::EnvscopeConfig;
use crate::validation::validate_config;

/// Variable that names an alternative config file.
pub const CONFIG_ENV_VAR: &str = "ENVSCOPE_CONFIG";

/// Where a config file is expected, and whether its absence is an error.
///
/// Explicitly named files (CLI flag or `ENVSCOPE_CONFIG`) are required; the
/// default location is optional and falls back to built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub required: bool,
}

/// A parsed config together with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: EnvscopeConfig,
    pub path: Option<PathBuf>,
}

/// `<home>/.envscope/config.toml`
pub fn default_config_path(home: Option<&Path>) -> Option<PathBuf> {
    home.map(|h| h.join(".envscope").join("config.toml"))
}

/// Pick the config location: CLI flag, then the env override, then the default.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    home: Option<&Path>,
) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        });
    }

    if let Some(value) = env_value
        && !value.trim().is_empty()
    {
        return Some(ConfigLocation {
            path: PathBuf::from(value),
            required: true,
        });
    }

    default_config_path(home).map(|path| ConfigLocation {
        path,
        required: false,
    })
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<EnvscopeConfig, ConfigError> {
    let config: EnvscopeConfig =
        toml::from_str(content).map_err(|e| ConfigError::ConfigParseError {
            message: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config at `location`, or built-in defaults when there is none.
pub fn load_config(location: Option<&ConfigLocation>) -> Result<LoadedConfig, ConfigError> {
    let Some(location) = location else {
        debug!(event = "config.load_skipped", reason = "no config location");
        return Ok(LoadedConfig::default());
    };

    if !location.path.exists() {
        if location.required {
            return Err(ConfigError::ConfigNotFound {
                path: location.path.display().to_string(),
            });
        }
        debug!(
            event = "config.load_defaults",
            path = %location.path.display()
        );
        return Ok(LoadedConfig::default());
    }

    let content = std::fs::read_to_string(&location.path)?;
    let config = parse_config(&content)?;

    info!(
        event = "config.load_completed",
        path = %location.path.display(),
        targets = config.targets.len()
    );

    Ok(LoadedConfig {
        config,
        path: Some(location.path.clone()),
    })
}
