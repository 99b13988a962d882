use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::bundles::prepare_bundles;
use crate::env::Environment;
use crate::launch::{ChainState, LaunchError, LaunchResult, LaunchSpec, load_config_for, plan_target};
use crate::process;
use crate::targets::{TargetRegistry, resolve_executable};

/// Arguments the launcher handed to the intermediary.
#[derive(Debug, Clone, Default)]
pub struct IntermediaryRequest {
    pub target: String,
    pub args: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub refresh_bundles: bool,
}

/// Everything up to the spawn: config, target lookup, executable resolution,
/// bundle cache and the final scoped environment.
///
/// Reads nothing but `env`, which is the intermediary's own environment as
/// the launcher decided it.
pub fn prepare_target(
    request: &IntermediaryRequest,
    env: &Environment,
) -> Result<LaunchSpec, LaunchError> {
    let loaded = load_config_for(request.config_path.as_deref(), env)?;
    let target = TargetRegistry::new(&loaded.config).lookup(&request.target, env)?;

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let program = resolve_executable(&target, env, &cwd)?;

    let bundles = prepare_bundles(&loaded.config, &target, env, request.refresh_bundles);
    let bundles_config = bundles
        .as_deref()
        .map(|path| (loaded.config.bundles.config_var(), path));

    plan_target(&target, program, &request.args, env, bundles_config)
}

/// Launch the final target and report its outcome.
pub fn run_intermediary(
    request: &IntermediaryRequest,
    env: &Environment,
) -> Result<LaunchResult, LaunchError> {
    info!(
        event = "core.intermediary.launch_started",
        target = %request.target,
        arg_count = request.args.len(),
        env_count = env.len()
    );

    let mut state = ChainState::NotStarted;
    state.start_intermediary()?;

    let spec = match prepare_target(request, env) {
        Ok(spec) => spec,
        Err(e) => return Err(fail(&mut state, &request.target, e)),
    };

    let running = match process::start(&spec) {
        Ok(running) => running,
        Err(e) => return Err(fail(&mut state, &request.target, e.into())),
    };
    state.start_target()?;

    let result = match state.settle(running.finish()) {
        Ok(result) => result,
        Err(e) => {
            error!(event = "core.intermediary.launch_failed", target = %request.target, error = %e);
            return Err(e);
        }
    };

    info!(
        event = "core.intermediary.launch_completed",
        target = %request.target,
        result = ?result
    );
    Ok(result)
}

fn fail(state: &mut ChainState, target: &str, err: LaunchError) -> LaunchError {
    if let Err(transition) = state.fail(err.to_string()) {
        warn!(event = "core.intermediary.state_transition_failed", error = %transition);
    }
    error!(
        event = "core.intermediary.launch_failed",
        target = target,
        error = %err
    );
    err
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::bundles::BUNDLE_MARKER_DIR;
    use crate::launch::WaitMode;
    use crate::targets::TargetError;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn request(config: PathBuf, target: &str, args: &[&str]) -> IntermediaryRequest {
        IntermediaryRequest {
            target: target.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            config_path: Some(config),
            refresh_bundles: false,
        }
    }

    #[test]
    fn test_target_env_contains_only_pass_and_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"
[targets.shell]
executable = "sh"

[targets.shell.environment]
pass = ["KEEP", "ABSENT"]
set = { MODE = "scoped" }
"#,
        );
        let env: Environment = [
            ("PATH", "/usr/bin:/bin"),
            ("KEEP", "1"),
            ("SECRET", "hunter2"),
        ]
        .into_iter()
        .collect();

        let spec = prepare_target(&request(config, "shell", &["-c", "exit 0"]), &env).unwrap();
        let names: Vec<_> = spec.environment().names().collect();
        assert_eq!(names, vec!["KEEP", "MODE"]);
        assert_eq!(spec.environment().get("MODE"), Some("scoped"));
        assert!(spec.program().is_absolute());
        assert_eq!(spec.args(), &["-c".to_string(), "exit 0".to_string()]);
        assert_eq!(spec.wait(), WaitMode::Wait);
    }

    #[test]
    fn test_run_intermediary_passes_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), "[targets.shell]\nexecutable = \"sh\"\n");
        let env: Environment = [("PATH", "/usr/bin:/bin")].into_iter().collect();

        let result = run_intermediary(&request(config, "shell", &["-c", "exit 4"]), &env).unwrap();
        assert_eq!(result, LaunchResult::Exited(4));
    }

    #[test]
    fn test_missing_executable_fails_with_launcher_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[targets.ghost]\nexecutable = \"envscope-no-such-program\"\n",
        );
        let env: Environment = [("PATH", "/usr/bin:/bin")].into_iter().collect();

        let err = run_intermediary(&request(config, "ghost", &[]), &env).unwrap_err();
        assert!(
            matches!(err, LaunchError::Target(TargetError::ExecutableNotFound { .. })),
            "got {:?}",
            err
        );
        assert_eq!(err.exit_code(), crate::errors::LAUNCHER_FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_bundles_config_advertised_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let roots = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(roots.path().join("repo").join(BUNDLE_MARKER_DIR)).unwrap();
        let cache = dir.path().join("cache");
        let config = write_config(
            dir.path(),
            &format!(
                "[bundles]\ncache_dir = {:?}\n\n[targets.shell]\nexecutable = \"sh\"\nbundles = true\n",
                cache.display().to_string()
            ),
        );
        let env: Environment = [
            ("PATH", "/usr/bin:/bin".to_string()),
            ("ENVOY_BNDL_ROOTS", roots.path().display().to_string()),
        ]
        .into_iter()
        .collect();

        let spec = prepare_target(&request(config, "shell", &[]), &env).unwrap();
        let advertised = spec.environment().get("ENVOY_BUNDLES_CONFIG").unwrap();
        assert!(Path::new(advertised).starts_with(&cache));
        assert!(Path::new(advertised).is_file());
        assert!(!spec.environment().contains("ENVOY_BNDL_ROOTS"));
    }
}
