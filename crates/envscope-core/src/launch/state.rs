use tracing::debug;

use super::errors::LaunchError;
use super::types::LaunchResult;
use crate::process::SpawnError;

/// Progress of one launch chain.
///
/// `NotStarted → IntermediaryRunning → TargetRunning → Completed`, with
/// `Failed` reachable before the target is running. A running process whose
/// wait fails also ends in `Failed`; see [`ChainState::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainState {
    NotStarted,
    IntermediaryRunning,
    TargetRunning,
    Completed(i32),
    Failed(String),
}

impl std::fmt::Display for ChainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainState::NotStarted => write!(f, "not_started"),
            ChainState::IntermediaryRunning => write!(f, "intermediary_running"),
            ChainState::TargetRunning => write!(f, "target_running"),
            ChainState::Completed(code) => write!(f, "completed({})", code),
            ChainState::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}

impl ChainState {
    pub fn start_intermediary(&mut self) -> Result<(), LaunchError> {
        match *self {
            ChainState::NotStarted => self.move_to(ChainState::IntermediaryRunning),
            _ => Err(self.invalid("intermediary_running")),
        }
    }

    pub fn start_target(&mut self) -> Result<(), LaunchError> {
        match *self {
            ChainState::IntermediaryRunning => self.move_to(ChainState::TargetRunning),
            _ => Err(self.invalid("target_running")),
        }
    }

    /// The launcher completes from `IntermediaryRunning` (it only sees the
    /// intermediary); the intermediary completes from `TargetRunning`.
    pub fn complete(&mut self, code: i32) -> Result<(), LaunchError> {
        match *self {
            ChainState::IntermediaryRunning | ChainState::TargetRunning => {
                self.move_to(ChainState::Completed(code))
            }
            _ => Err(self.invalid("completed")),
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), LaunchError> {
        match *self {
            ChainState::NotStarted | ChainState::IntermediaryRunning => {
                self.move_to(ChainState::Failed(reason.into()))
            }
            _ => Err(self.invalid("failed")),
        }
    }

    /// Record how the running process ended.
    ///
    /// An exit or signal completes the chain. A failed wait leaves no exit
    /// status to report, so the chain fails instead.
    pub fn settle(
        &mut self,
        outcome: Result<LaunchResult, SpawnError>,
    ) -> Result<LaunchResult, LaunchError> {
        match outcome {
            Ok(result) => {
                self.complete(result.exit_code())?;
                Ok(result)
            }
            Err(e) => {
                let err = LaunchError::from(e);
                match *self {
                    ChainState::IntermediaryRunning | ChainState::TargetRunning => {
                        self.move_to(ChainState::Failed(err.to_string()))?
                    }
                    _ => return Err(self.invalid("failed")),
                }
                Err(err)
            }
        }
    }

    fn move_to(&mut self, next: ChainState) -> Result<(), LaunchError> {
        debug!(
            event = "core.launch.state_changed",
            from = %self,
            to = %next
        );
        *self = next;
        Ok(())
    }

    fn invalid(&self, to: &str) -> LaunchError {
        LaunchError::InvalidTransition {
            from: self.to_string(),
            to: to.to_string(),
        }
    }
}
