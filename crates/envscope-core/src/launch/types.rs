use std::path::{Path, PathBuf};

use crate::env::Environment;

/// How a process in the chain gets its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    /// The caller's full environment snapshot.
    Inherit,
    /// Only an explicitly enumerated set of variables.
    Scoped,
}

impl std::fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationMode::Inherit => write!(f, "inherit"),
            PropagationMode::Scoped => write!(f, "scoped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    /// Block until the child exits.
    #[default]
    Wait,
    /// Return as soon as the child has started.
    Detach,
}

/// One process to start: program, verbatim arguments, and its environment.
///
/// Fields are fixed at construction; the spawner only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: PathBuf,
    args: Vec<String>,
    environment: Environment,
    mode: PropagationMode,
    wait: WaitMode,
}

impl LaunchSpec {
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        environment: Environment,
        mode: PropagationMode,
        wait: WaitMode,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            environment,
            mode,
            wait,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn mode(&self) -> PropagationMode {
        self.mode
    }

    pub fn wait(&self) -> WaitMode {
        self.wait
    }
}

/// Outcome of a started child.
///
/// A child that exits non-zero or dies from a signal is still a result, not
/// an error; the caller decides what a non-zero code means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchResult {
    Exited(i32),
    Signaled(i32),
    Detached(u32),
}

impl LaunchResult {
    /// Exit code to propagate. Signal deaths follow the shell's `128 + n`.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchResult::Exited(code) => *code,
            LaunchResult::Signaled(signal) => 128 + signal,
            LaunchResult::Detached(_) => 0,
        }
    }
}
