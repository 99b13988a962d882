use std::path::PathBuf;

use clap::ArgMatches;
use envscope_core::{Environment, LauncherRequest};

mod launch;
mod targets;

/// Dispatch the parsed command line and return the process exit code.
pub fn run_command(matches: &ArgMatches) -> i32 {
    let snapshot = envscope_core::capture();

    if matches.get_flag("list-targets") {
        return targets::handle_list_targets(matches, &snapshot);
    }

    let request = launcher_request(matches);
    if matches.get_flag("dry-run") {
        launch::handle_dry_run(&request, &snapshot)
    } else {
        launch::handle_launch(&request, &snapshot)
    }
}

fn launcher_request(matches: &ArgMatches) -> LauncherRequest {
    LauncherRequest {
        target: matches
            .get_one::<String>("target")
            .cloned()
            .unwrap_or_default(),
        args: matches
            .get_many::<String>("args")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        inherit_env: matches.get_flag("inherit-env"),
        config_path: config_path(matches),
        refresh_bundles: matches.get_flag("refresh-bundles"),
        verbose: matches.get_flag("verbose"),
    }
}

fn config_path(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<String>("config").map(PathBuf::from)
}

fn snapshot_summary(env: &Environment) -> String {
    env.names().collect::<Vec<_>>().join(", ")
}
