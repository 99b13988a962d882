use std::process::{Child, Command, ExitStatus};

use tracing::{debug, error, info, warn};

use super::errors::SpawnError;
use super::signals::{self, ForwardGuard};
use crate::launch::{LaunchResult, LaunchSpec, WaitMode};

/// Start the process described by `spec` and report its outcome.
///
/// Equivalent to [`start`] followed by [`RunningChild::finish`].
pub fn spawn(spec: &LaunchSpec) -> Result<LaunchResult, SpawnError> {
    start(spec)?.finish()
}

/// Create the child process described by `spec`.
///
/// The child's environment is cleared and replaced by `spec.environment()` in
/// every mode; nothing reaches the child implicitly. Standard streams are
/// inherited. For [`WaitMode::Wait`] termination signals are forwarded to the
/// child from this point until [`RunningChild::finish`] returns.
///
/// Refuses to start anything once a forwarded signal has been received.
pub fn start(spec: &LaunchSpec) -> Result<RunningChild, SpawnError> {
    let program = spec.program().display().to_string();

    refuse_if_interrupted(&program)?;

    let mut command = Command::new(spec.program());
    command
        .args(spec.args())
        .env_clear()
        .envs(spec.environment().iter());

    info!(
        event = "core.process.spawn_started",
        program = %program,
        arg_count = spec.args().len(),
        mode = %spec.mode(),
        env_count = spec.environment().len(),
        wait = ?spec.wait()
    );

    let mut guard = match spec.wait() {
        WaitMode::Wait => Some(ForwardGuard::install()?),
        WaitMode::Detach => None,
    };
    // A signal caught by the new handlers before the spawn must not start a child.
    refuse_if_interrupted(&program)?;

    let child = command.spawn().map_err(|e| {
        error!(
            event = "core.process.spawn_failed",
            program = %program,
            error = %e
        );
        SpawnError::from_io(&program, &e)
    })?;

    if let Some(guard) = guard.as_mut() {
        guard.set_child(child.id());
    }

    Ok(RunningChild {
        child,
        program,
        guard,
    })
}

/// A started child, not yet waited on.
pub struct RunningChild {
    child: Child,
    program: String,
    guard: Option<ForwardGuard>,
}

impl RunningChild {
    /// Wait for the child, or return at once for a detached launch.
    pub fn finish(mut self) -> Result<LaunchResult, SpawnError> {
        let pid = self.child.id();

        if self.guard.is_none() {
            info!(
                event = "core.process.spawn_detached",
                program = %self.program,
                pid = pid
            );
            return Ok(LaunchResult::Detached(pid));
        }

        debug!(event = "core.process.wait_started", program = %self.program, pid = pid);

        let status = self.child.wait().map_err(|e| {
            error!(
                event = "core.process.wait_failed",
                program = %self.program,
                pid = pid,
                error = %e
            );
            SpawnError::WaitFailed {
                program: self.program.clone(),
                message: e.to_string(),
            }
        })?;

        let result = result_from_status(status);
        info!(
            event = "core.process.spawn_completed",
            program = %self.program,
            pid = pid,
            result = ?result,
            exit_code = result.exit_code()
        );
        Ok(result)
    }
}

fn refuse_if_interrupted(program: &str) -> Result<(), SpawnError> {
    if !signals::interrupted() {
        return Ok(());
    }
    let signal = signals::interrupt_signal().unwrap_or(0);
    warn!(
        event = "core.process.spawn_abandoned",
        program = %program,
        signal = signal
    );
    Err(SpawnError::Interrupted { signal })
}

#[cfg(unix)]
fn result_from_status(status: ExitStatus) -> LaunchResult {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => LaunchResult::Exited(code),
        (None, Some(signal)) => LaunchResult::Signaled(signal),
        (None, None) => LaunchResult::Exited(1),
    }
}

#[cfg(not(unix))]
fn result_from_status(status: ExitStatus) -> LaunchResult {
    LaunchResult::Exited(status.code().unwrap_or(1))
}
