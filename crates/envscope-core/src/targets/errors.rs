use crate::errors::EnvscopeError;

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Unknown target '{name}'. Known targets: {known}")]
    UnknownTarget { name: String, known: String },

    #[error("Cannot locate executable for target '{target}'. Tried: {tried}")]
    ExecutableNotFound { target: String, tried: String },
}

impl EnvscopeError for TargetError {
    fn error_code(&self) -> &'static str {
        match self {
            TargetError::UnknownTarget { .. } => "UNKNOWN_TARGET",
            TargetError::ExecutableNotFound { .. } => "TARGET_EXECUTABLE_NOT_FOUND",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
