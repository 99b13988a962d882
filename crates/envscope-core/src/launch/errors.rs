use crate::env::EnvError;
use crate::errors::{ConfigError, EnvscopeError, LAUNCHER_FAILURE_EXIT_CODE};
use crate::process::SpawnError;
use crate::targets::TargetError;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("Invalid launch state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl LaunchError {
    /// Exit code for a chain that failed before the target could report one.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Spawn(SpawnError::Interrupted { signal }) => 128 + signal,
            _ => LAUNCHER_FAILURE_EXIT_CODE,
        }
    }
}

impl EnvscopeError for LaunchError {
    fn error_code(&self) -> &'static str {
        match self {
            LaunchError::Config(e) => e.error_code(),
            LaunchError::Env(e) => e.error_code(),
            LaunchError::Target(e) => e.error_code(),
            LaunchError::Spawn(e) => e.error_code(),
            LaunchError::InvalidTransition { .. } => "LAUNCH_INVALID_TRANSITION",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            LaunchError::Config(e) => e.is_user_error(),
            LaunchError::Env(e) => e.is_user_error(),
            LaunchError::Target(e) => e.is_user_error(),
            LaunchError::Spawn(e) => e.is_user_error(),
            LaunchError::InvalidTransition { .. } => false,
        }
    }
}
