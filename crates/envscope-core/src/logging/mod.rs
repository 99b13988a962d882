use tracing_subscriber::EnvFilter;

/// Initialise structured logging to stderr.
///
/// Quiet mode only reports warnings and errors; verbose mode adds the
/// `info`/`debug` launch events. `RUST_LOG` takes precedence when set.
/// Calling this more than once is harmless.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
