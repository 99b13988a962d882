use std::path::PathBuf;

use crate::errors::EnvscopeError;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Bundle cache IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize bundle cache: {message}")]
    Serialize { message: String },

    #[error("No directory available for the bundle cache")]
    NoCacheDir,
}

impl EnvscopeError for BundleError {
    fn error_code(&self) -> &'static str {
        match self {
            BundleError::Io { .. } => "BUNDLE_CACHE_IO_ERROR",
            BundleError::Serialize { .. } => "BUNDLE_CACHE_SERIALIZE_ERROR",
            BundleError::NoCacheDir => "BUNDLE_CACHE_NO_DIR",
        }
    }
}
