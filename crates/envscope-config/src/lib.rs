//! Configuration for envscope.
//!
//! The config file declares the registered targets, the environment each
//! target's final process receives, and what the intermediary is allowed to
//! see when the caller does not pass `--inherit-env`.

pub mod errors;
pub mod loading;
pub mod types;
pub mod validation;

pub use errors::ConfigError;
pub use loading::{
    CONFIG_ENV_VAR, ConfigLocation, LoadedConfig, default_config_path, load_config, parse_config,
    resolve_config_path,
};
pub use types::{BundlesConfig, EnvironmentConfig, EnvscopeConfig, LauncherConfig, TargetConfig};
pub use validation::{is_valid_env_name, validate_config};
