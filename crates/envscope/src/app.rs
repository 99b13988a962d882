use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("envscope")
        .about("Launch a program through an intermediary with a scoped environment")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: $ENVSCOPE_CONFIG, then ~/.envscope/config.toml)"),
        )
        .arg(
            Arg::new("inherit-env")
                .long("inherit-env")
                .help("Give the intermediary the full caller environment")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("refresh-bundles")
                .long("refresh-bundles")
                .help("Rebuild the bundle cache even if it looks current")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the intermediary launch without running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-targets")
                .long("list-targets")
                .help("List the registered targets and exit")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["target", "dry-run", "inherit-env"]),
        )
        .arg(
            Arg::new("target")
                .help("Target to launch (e.g. vscode)")
                .required_unless_present("list-targets")
                .index(1),
        )
        .arg(
            Arg::new("args")
                .help("Arguments forwarded verbatim to the target")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .index(2),
        )
}
