use envscope_core::{Environment, EnvscopeError, LaunchResult, LauncherRequest};
use tracing::{error, info, warn};

use super::snapshot_summary;

pub(crate) fn handle_launch(request: &LauncherRequest, snapshot: &Environment) -> i32 {
    info!(
        event = "cli.launch_started",
        target = %request.target,
        inherit_env = request.inherit_env,
        arg_count = request.args.len()
    );

    match envscope_core::run_launcher(request, snapshot) {
        Ok(result) => {
            if let LaunchResult::Signaled(signal) = result {
                warn!(
                    event = "cli.launch_signaled",
                    target = %request.target,
                    signal = signal
                );
            }
            info!(
                event = "cli.launch_completed",
                target = %request.target,
                exit_code = result.exit_code()
            );
            result.exit_code()
        }
        Err(e) => {
            eprintln!("❌ Failed to launch '{}': {}", request.target, e);
            if e.is_user_error() {
                warn!(
                    event = "cli.launch_failed",
                    target = %request.target,
                    error_code = e.error_code(),
                    error = %e
                );
            } else {
                error!(
                    event = "cli.launch_failed",
                    target = %request.target,
                    error_code = e.error_code(),
                    error = %e
                );
            }
            e.exit_code()
        }
    }
}

pub(crate) fn handle_dry_run(request: &LauncherRequest, snapshot: &Environment) -> i32 {
    match envscope_core::plan_launch(request, snapshot) {
        Ok(plan) => {
            let spec = &plan.intermediary;
            println!("Target:       {}", plan.target.name());
            println!("Intermediary: {}", spec.program().display());
            println!("Arguments:    {:?}", spec.args());
            println!("Mode:         {}", spec.mode());
            println!("Environment:  {}", snapshot_summary(spec.environment()));
            info!(
                event = "cli.dry_run_completed",
                target = plan.target.name(),
                env_count = spec.environment().len()
            );
            0
        }
        Err(e) => {
            eprintln!("❌ Failed to plan '{}': {}", request.target, e);
            error!(
                event = "cli.dry_run_failed",
                target = %request.target,
                error_code = e.error_code(),
                error = %e
            );
            e.exit_code()
        }
    }
}
