use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("envscope-wrapper")
        .about("Resolve a target and run it with its scoped environment")
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
                .help("Config file handed down by the launcher"),
        )
        .arg(
            Arg::new("refresh-bundles")
                .long("refresh-bundles")
                .help("Rebuild the bundle cache even if it looks current")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("target")
                .help("Target to launch")
                .required(true)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_launcher_argv_shape() {
        let matches = build_cli()
            .try_get_matches_from([
                "envscope-wrapper",
                "--config",
                "/etc/envscope.toml",
                "--refresh-bundles",
                "--verbose",
                "vscode",
                "--",
                "--config",
                "x",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<String>("config").unwrap(), "/etc/envscope.toml");
        assert!(matches.get_flag("refresh-bundles"));
        assert_eq!(matches.get_one::<String>("target").unwrap(), "vscode");
        let args: Vec<&String> = matches.get_many::<String>("args").unwrap().collect();
        assert_eq!(args, vec!["--config", "x"]);
    }
}
