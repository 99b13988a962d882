//! Environment values passed to spawned processes.
//!
//! [`capture`] is the only place the ambient process environment is read.
//! Everything downstream works on explicit [`Environment`] values, and the
//! narrow environments are built up from nothing by [`ScopedEnvBuilder`].

pub mod builder;
pub mod errors;
pub mod snapshot;

pub use builder::ScopedEnvBuilder;
pub use errors::EnvError;
pub use snapshot::{Environment, capture};
