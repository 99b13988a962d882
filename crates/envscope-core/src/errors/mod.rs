use std::error::Error;

pub use envscope_config::ConfigError;

/// Exit code reserved for failures of the launch chain itself.
///
/// Anything that stops the chain before the final target runs (bad config,
/// unknown target, environment capture, spawn failure) exits with this code
/// so callers can tell a misconfigured tool from a target that reported an error.
pub const LAUNCHER_FAILURE_EXIT_CODE: i32 = 125;

/// Base trait for all application errors
pub trait EnvscopeError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type EnvscopeResult<T> = Result<T, Box<dyn EnvscopeError>>;

impl EnvscopeError for ConfigError {
    fn error_code(&self) -> &'static str {
        self.code()
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigNotFound { .. }
                | ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}
