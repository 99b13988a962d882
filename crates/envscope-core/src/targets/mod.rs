pub mod backends;
pub mod errors;
pub mod registry;
pub mod resolve;
pub mod traits;
pub mod types;

// Re-export public API
pub use errors::TargetError;
pub use registry::TargetRegistry;
pub use resolve::resolve_executable;
pub use traits::TargetBackend;
pub use types::TargetDefinition;
