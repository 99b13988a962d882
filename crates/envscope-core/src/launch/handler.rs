use std::path::{Path, PathBuf};

use envscope_config::{CONFIG_ENV_VAR, LoadedConfig, load_config, resolve_config_path};
use tracing::{error, info, warn};

use super::errors::LaunchError;
use super::planner::{IntermediaryCommand, LaunchPlan, ScopedLauncher};
use super::state::ChainState;
use super::types::LaunchResult;
use crate::env::Environment;
use crate::errors::ConfigError;
use crate::process;

/// What the user asked the launcher to do.
#[derive(Debug, Clone, Default)]
pub struct LauncherRequest {
    pub target: String,
    pub args: Vec<String>,
    pub inherit_env: bool,
    pub config_path: Option<PathBuf>,
    pub refresh_bundles: bool,
    pub verbose: bool,
}

/// Load the config the way both stages do: `--config`, then
/// `ENVSCOPE_CONFIG` from `snapshot`, then `~/.envscope/config.toml`.
pub fn load_config_for(
    explicit: Option<&Path>,
    snapshot: &Environment,
) -> Result<LoadedConfig, ConfigError> {
    let home = snapshot
        .get("HOME")
        .filter(|h| !h.trim().is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir);
    let location = resolve_config_path(explicit, snapshot.get(CONFIG_ENV_VAR), home.as_deref());
    load_config(location.as_ref())
}

/// Resolve config, target and intermediary without spawning anything.
pub fn plan_launch(
    request: &LauncherRequest,
    snapshot: &Environment,
) -> Result<LaunchPlan, LaunchError> {
    let loaded = load_config_for(request.config_path.as_deref(), snapshot)?;

    let current_exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let intermediary =
        IntermediaryCommand::resolve(&loaded.config, snapshot, current_exe.as_deref(), &cwd)?;

    ScopedLauncher::new(&loaded.config, snapshot, intermediary)
        .with_config_path(loaded.path.as_deref())
        .with_refresh_bundles(request.refresh_bundles)
        .with_verbose(request.verbose)
        .plan(&request.target, &request.args, request.inherit_env)
}

/// Run the whole chain from the launcher's side and report the intermediary's
/// outcome, which carries the target's exit status.
pub fn run_launcher(
    request: &LauncherRequest,
    snapshot: &Environment,
) -> Result<LaunchResult, LaunchError> {
    info!(
        event = "core.launch.chain_started",
        target = %request.target,
        inherit_env = request.inherit_env,
        arg_count = request.args.len()
    );

    let mut state = ChainState::NotStarted;

    let plan = match plan_launch(request, snapshot) {
        Ok(plan) => plan,
        Err(e) => return Err(fail(&mut state, &request.target, e)),
    };

    let running = match process::start(&plan.intermediary) {
        Ok(running) => running,
        Err(e) => return Err(fail(&mut state, &request.target, e.into())),
    };
    state.start_intermediary()?;

    let result = match state.settle(running.finish()) {
        Ok(result) => result,
        Err(e) => {
            error!(event = "core.launch.chain_failed", target = %request.target, error = %e);
            return Err(e);
        }
    };

    info!(
        event = "core.launch.chain_completed",
        target = plan.target.name(),
        exit_code = result.exit_code()
    );
    Ok(result)
}

fn fail(state: &mut ChainState, target: &str, err: LaunchError) -> LaunchError {
    if let Err(transition) = state.fail(err.to_string()) {
        warn!(event = "core.launch.state_transition_failed", error = %transition);
    }
    error!(
        event = "core.launch.chain_failed",
        target = target,
        error = %err
    );
    err
}
