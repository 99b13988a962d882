use clap::ArgMatches;
use envscope_core::launch::load_config_for;
use envscope_core::{Environment, EnvscopeError, TargetRegistry};
use tracing::{error, info};

use super::config_path;

pub(crate) fn handle_list_targets(matches: &ArgMatches, snapshot: &Environment) -> i32 {
    let loaded = match load_config_for(config_path(matches).as_deref(), snapshot) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            error!(
                event = "cli.list_targets_failed",
                error_code = e.error_code(),
                error = %e
            );
            return envscope_core::LAUNCHER_FAILURE_EXIT_CODE;
        }
    };

    let names = TargetRegistry::new(&loaded.config).names();
    for name in &names {
        println!("{}", name);
    }

    info!(event = "cli.list_targets_completed", count = names.len());
    0
}
