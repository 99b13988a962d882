use std::path::PathBuf;

use clap::ArgMatches;
use envscope_core::{EnvscopeError, IntermediaryRequest, init_logging, run_intermediary};
use tracing::{error, info};

mod app;

fn main() {
    let matches = app::build_cli().get_matches();

    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    std::process::exit(run(&matches));
}

fn run(matches: &ArgMatches) -> i32 {
    let env = envscope_core::capture();

    let request = IntermediaryRequest {
        target: matches
            .get_one::<String>("target")
            .cloned()
            .unwrap_or_default(),
        args: matches
            .get_many::<String>("args")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        config_path: matches.get_one::<String>("config").map(PathBuf::from),
        refresh_bundles: matches.get_flag("refresh-bundles"),
    };

    match run_intermediary(&request, &env) {
        Ok(result) => {
            info!(
                event = "cli.wrapper.completed",
                target = %request.target,
                exit_code = result.exit_code()
            );
            result.exit_code()
        }
        Err(e) => {
            eprintln!("❌ Failed to start '{}': {}", request.target, e);
            error!(
                event = "cli.wrapper.failed",
                target = %request.target,
                error_code = e.error_code(),
                error = %e
            );
            e.exit_code()
        }
    }
}
