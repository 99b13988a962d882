use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use envscope_config::EnvscopeConfig;
use tracing::{debug, info};

use super::errors::LaunchError;
use super::types::{LaunchSpec, PropagationMode, WaitMode};
use crate::bundles::BUNDLE_LOCATION_VARS;
use crate::env::{Environment, ScopedEnvBuilder};
use crate::process::SpawnError;
use crate::targets::{TargetDefinition, TargetRegistry};

/// Name of the bundled intermediary binary.
pub const WRAPPER_BIN: &str = "envscope-wrapper";

/// The intermediary program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediaryCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl IntermediaryCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Resolve the intermediary: `launcher.intermediary` from the config, else
    /// the wrapper installed next to `current_exe`, else the wrapper on the
    /// caller's `PATH`.
    ///
    /// The program is resolved to a path up front because the child's
    /// environment is replaced wholesale and may carry no `PATH` at all.
    pub fn resolve(
        config: &EnvscopeConfig,
        env: &Environment,
        current_exe: Option<&Path>,
        cwd: &Path,
    ) -> Result<Self, SpawnError> {
        if let Some(command) = config.launcher.intermediary()
            && let Some((program, args)) = command.split_first()
        {
            let resolved = lookup(program, env, cwd)?;
            return Ok(Self::new(resolved, args.to_vec()));
        }

        let wrapper = format!("{}{}", WRAPPER_BIN, std::env::consts::EXE_SUFFIX);
        if let Some(sibling) = current_exe
            .and_then(Path::parent)
            .map(|dir| dir.join(&wrapper))
            && sibling.is_file()
        {
            return Ok(Self::new(sibling, Vec::new()));
        }

        Ok(Self::new(lookup(&wrapper, env, cwd)?, Vec::new()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn lookup(program: &str, env: &Environment, cwd: &Path) -> Result<PathBuf, SpawnError> {
    which::which_in(program, env.get_os("PATH"), cwd).map_err(|e| SpawnError::ExecutableNotFound {
        program: program.to_string(),
        message: e.to_string(),
    })
}

/// The resolved target and the intermediary process that will launch it.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub target: TargetDefinition,
    pub intermediary: LaunchSpec,
}

/// Decides what environment the intermediary receives.
///
/// With `inherit_env` the intermediary gets the caller's full snapshot so it
/// can find tools on the caller's search path. Without it, the intermediary
/// gets only the declared minimal set. The final target's environment is
/// never decided here: the intermediary builds it with [`plan_target`].
pub struct ScopedLauncher<'a> {
    config: &'a EnvscopeConfig,
    snapshot: &'a Environment,
    intermediary: IntermediaryCommand,
    config_path: Option<&'a Path>,
    refresh_bundles: bool,
    verbose: bool,
}

impl<'a> ScopedLauncher<'a> {
    pub fn new(
        config: &'a EnvscopeConfig,
        snapshot: &'a Environment,
        intermediary: IntermediaryCommand,
    ) -> Self {
        Self {
            config,
            snapshot,
            intermediary,
            config_path: None,
            refresh_bundles: false,
            verbose: false,
        }
    }

    /// Config file handed to the intermediary, so both stages read the same targets.
    pub fn with_config_path(mut self, path: Option<&'a Path>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_refresh_bundles(mut self, refresh: bool) -> Self {
        self.refresh_bundles = refresh;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Plan the intermediary launch for `target_name`.
    ///
    /// Unknown or empty names fail here, before anything is spawned.
    pub fn plan(
        &self,
        target_name: &str,
        args: &[String],
        inherit_env: bool,
    ) -> Result<LaunchPlan, LaunchError> {
        let target = TargetRegistry::new(self.config).lookup(target_name, self.snapshot)?;

        let (environment, mode) = if inherit_env {
            (self.snapshot.clone(), PropagationMode::Inherit)
        } else {
            let env = ScopedEnvBuilder::new()
                .pass_through_all(self.intermediary_env_names(&target), self.snapshot)?
                .build();
            (env, PropagationMode::Scoped)
        };

        let mut argv = self.intermediary.args().to_vec();
        if let Some(path) = self.config_path {
            argv.push("--config".to_string());
            argv.push(path.display().to_string());
        }
        if self.refresh_bundles {
            argv.push("--refresh-bundles".to_string());
        }
        if self.verbose {
            argv.push("--verbose".to_string());
        }
        argv.push(target.name().to_string());
        argv.push("--".to_string());
        argv.extend(args.iter().cloned());

        info!(
            event = "core.launch.plan_completed",
            target = target.name(),
            mode = %mode,
            intermediary = %self.intermediary.program().display(),
            env_count = environment.len(),
            arg_count = args.len()
        );

        let intermediary = LaunchSpec::new(
            self.intermediary.program(),
            argv,
            environment,
            mode,
            WaitMode::Wait,
        );

        Ok(LaunchPlan {
            target,
            intermediary,
        })
    }

    /// The declared minimal set for a scoped intermediary.
    ///
    /// Covers everything the intermediary reads: the configured
    /// `intermediary_env`, the target's pass-through names, its executable
    /// override variable, and the bundle-cache inputs when enabled. The
    /// target's own environment therefore comes out the same whether or not
    /// the caller inherited.
    pub fn intermediary_env_names(&self, target: &TargetDefinition) -> Vec<String> {
        let mut names: BTreeSet<String> = self.config.launcher.intermediary_env().into_iter().collect();
        names.extend(target.pass().iter().cloned());
        if let Some(var) = target.executable_var() {
            names.insert(var.to_string());
        }
        if target.bundles() {
            names.insert(self.config.bundles.roots_var().to_string());
            names.extend(BUNDLE_LOCATION_VARS.iter().map(|s| s.to_string()));
        }
        names.into_iter().collect()
    }
}

/// Build the final target's launch, always in `Scoped` mode.
///
/// The environment starts empty and receives only the target's pass-through
/// names (copied from `intermediary_env` when present), its literal `set`
/// values, and the bundle cache variable. Arguments are forwarded verbatim.
pub fn plan_target(
    target: &TargetDefinition,
    program: PathBuf,
    args: &[String],
    intermediary_env: &Environment,
    bundles_config: Option<(&str, &Path)>,
) -> Result<LaunchSpec, LaunchError> {
    let mut builder = ScopedEnvBuilder::new().pass_through_all(target.pass(), intermediary_env)?;
    for (name, value) in target.set() {
        builder = builder.set(name.as_str(), value.as_str())?;
    }
    if let Some((var, path)) = bundles_config {
        builder = builder.set(var, path.display().to_string())?;
    }
    let environment = builder.build();

    let wait = if target.wait() {
        WaitMode::Wait
    } else {
        WaitMode::Detach
    };

    debug!(
        event = "core.launch.target_planned",
        target = target.name(),
        program = %program.display(),
        env = ?environment.names().collect::<Vec<_>>(),
        wait = ?wait
    );

    Ok(LaunchSpec::new(
        program,
        args.to_vec(),
        environment,
        PropagationMode::Scoped,
        wait,
    ))
}
