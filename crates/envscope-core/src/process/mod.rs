//! Child process creation and signal forwarding.

pub mod errors;
pub mod signals;
pub mod spawner;

pub use errors::SpawnError;
pub use signals::{ForwardGuard, interrupted};
pub use spawner::{RunningChild, spawn, start};
