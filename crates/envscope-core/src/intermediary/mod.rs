//! The intermediary stage: builds the final target's scoped environment from
//! its own and launches the target.

pub mod handler;

pub use handler::{IntermediaryRequest, prepare_target, run_intermediary};
