use crate::errors::EnvscopeError;

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("Executable not found: {program} ({message})")]
    ExecutableNotFound { program: String, message: String },

    #[error("Permission denied executing {program}: {message}")]
    PermissionDenied { program: String, message: String },

    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Failed waiting for {program}: {message}")]
    WaitFailed { program: String, message: String },

    #[error("Failed to install signal forwarding: {message}")]
    SignalSetup { message: String },

    #[error("Launch abandoned after signal {signal}")]
    Interrupted { signal: i32 },
}

impl SpawnError {
    pub(crate) fn from_io(program: &str, error: &std::io::Error) -> Self {
        let program = program.to_string();
        let message = error.to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => SpawnError::ExecutableNotFound { program, message },
            std::io::ErrorKind::PermissionDenied => {
                SpawnError::PermissionDenied { program, message }
            }
            _ => SpawnError::SpawnFailed { program, message },
        }
    }
}

impl EnvscopeError for SpawnError {
    fn error_code(&self) -> &'static str {
        match self {
            SpawnError::ExecutableNotFound { .. } => "SPAWN_EXECUTABLE_NOT_FOUND",
            SpawnError::PermissionDenied { .. } => "SPAWN_PERMISSION_DENIED",
            SpawnError::SpawnFailed { .. } => "SPAWN_FAILED",
            SpawnError::WaitFailed { .. } => "SPAWN_WAIT_FAILED",
            SpawnError::SignalSetup { .. } => "SPAWN_SIGNAL_SETUP_FAILED",
            SpawnError::Interrupted { .. } => "SPAWN_INTERRUPTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SpawnError::ExecutableNotFound { .. }
                | SpawnError::PermissionDenied { .. }
                | SpawnError::Interrupted { .. }
        )
    }
}
