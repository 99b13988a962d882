//! Launch planning: which environment each process in the chain receives.

pub mod errors;
pub mod handler;
pub mod planner;
pub mod state;
pub mod types;

pub use errors::LaunchError;
pub use handler::{LauncherRequest, load_config_for, plan_launch, run_launcher};
pub use planner::{IntermediaryCommand, LaunchPlan, ScopedLauncher, plan_target};
pub use state::ChainState;
pub use types::{LaunchResult, LaunchSpec, PropagationMode, WaitMode};
