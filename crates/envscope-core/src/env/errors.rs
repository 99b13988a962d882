use crate::errors::EnvscopeError;

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid environment variable name '{name}'")]
    InvalidName { name: String },
}

impl EnvscopeError for EnvError {
    fn error_code(&self) -> &'static str {
        match self {
            EnvError::InvalidName { .. } => "ENV_INVALID_NAME",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, EnvError::InvalidName { .. })
    }
}
