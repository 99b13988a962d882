pub mod bundles;
pub mod env;
pub mod errors;
pub mod intermediary;
pub mod launch;
pub mod logging;
pub mod process;
pub mod targets;

pub use env::{Environment, ScopedEnvBuilder, capture};
pub use errors::{EnvscopeError, LAUNCHER_FAILURE_EXIT_CODE};
pub use intermediary::{IntermediaryRequest, run_intermediary};
pub use launch::{
    LaunchError, LaunchPlan, LaunchResult, LaunchSpec, LauncherRequest, PropagationMode,
    ScopedLauncher, WaitMode, plan_launch, run_launcher,
};
pub use logging::init_logging;
pub use targets::{TargetRegistry, resolve_executable};
