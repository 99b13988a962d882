//! Forwarding of termination signals to the running child.
//!
//! While a [`ForwardGuard`] is alive, SIGINT, SIGTERM, SIGHUP and SIGQUIT
//! received by this process are re-sent to the registered child and recorded
//! in a process-global flag. Once the flag is set no further launch may
//! start; see [`interrupted`].
//!
//! Signal handlers cannot reach instance data, so the child pid and the flag
//! are process-global atomics. Only one child is registered at a time, which
//! matches the launch chain: one process in flight, waited on synchronously.

pub use imp::ForwardGuard;

/// Whether a forwarded signal has been received by this process.
pub fn interrupted() -> bool {
    imp::interrupted()
}

/// The last signal recorded by the forwarding handler.
pub fn interrupt_signal() -> Option<i32> {
    imp::interrupt_signal()
}

/// The child currently receiving forwarded signals.
pub fn current_child() -> Option<u32> {
    imp::current_child()
}

#[cfg(unix)]
mod imp {
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    use nix::libc;
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
    use nix::unistd::Pid;
    use tracing::{debug, warn};

    use crate::process::errors::SpawnError;

    static CHILD_PID: AtomicI32 = AtomicI32::new(0);
    static INTERRUPTED: AtomicBool = AtomicBool::new(false);
    static LAST_SIGNAL: AtomicI32 = AtomicI32::new(0);

    const FORWARDED: [Signal; 4] = [
        Signal::SIGINT,
        Signal::SIGTERM,
        Signal::SIGHUP,
        Signal::SIGQUIT,
    ];

    extern "C" fn forward_signal(sig: libc::c_int) {
        LAST_SIGNAL.store(sig, Ordering::SeqCst);
        INTERRUPTED.store(true, Ordering::SeqCst);
        let child = CHILD_PID.load(Ordering::SeqCst);
        if child > 0 {
            // SAFETY: kill() is async-signal-safe
            unsafe {
                libc::kill(child, sig);
            }
        }
    }

    /// Installs the forwarding handlers; restores the previous ones on drop.
    pub struct ForwardGuard {
        previous: Vec<(Signal, SigAction)>,
        registered_child: bool,
    }

    impl ForwardGuard {
        pub fn install() -> Result<Self, SpawnError> {
            let action = SigAction::new(
                SigHandler::Handler(forward_signal),
                SaFlags::SA_RESTART,
                SigSet::empty(),
            );

            let mut previous = Vec::with_capacity(FORWARDED.len());
            for sig in FORWARDED {
                // SAFETY: the handler only touches atomics and calls kill()
                match unsafe { signal::sigaction(sig, &action) } {
                    Ok(old) => previous.push((sig, old)),
                    Err(e) => {
                        restore(&previous);
                        return Err(SpawnError::SignalSetup {
                            message: format!("{}: {}", sig, e),
                        });
                    }
                }
            }

            debug!(event = "core.process.signal_forwarding_installed");
            Ok(Self {
                previous,
                registered_child: false,
            })
        }

        /// Register the child that receives forwarded signals.
        ///
        /// A signal that arrived after the spawn but before registration is
        /// delivered now, so the child is never left running unaware.
        pub fn set_child(&mut self, pid: u32) {
            let Ok(raw) = i32::try_from(pid) else {
                warn!(event = "core.process.signal_child_pid_invalid", pid = pid);
                return;
            };
            CHILD_PID.store(raw, Ordering::SeqCst);
            self.registered_child = true;

            if INTERRUPTED.load(Ordering::SeqCst) {
                let pending = Signal::try_from(LAST_SIGNAL.load(Ordering::SeqCst)).ok();
                if let Err(e) = signal::kill(Pid::from_raw(raw), pending) {
                    warn!(
                        event = "core.process.signal_forward_failed",
                        pid = pid,
                        error = %e
                    );
                }
            }
        }
    }

    impl Drop for ForwardGuard {
        fn drop(&mut self) {
            if self.registered_child {
                CHILD_PID.store(0, Ordering::SeqCst);
            }
            restore(&self.previous);
        }
    }

    fn restore(previous: &[(Signal, SigAction)]) {
        for (sig, old) in previous {
            // SAFETY: reinstating the action that was in place before install()
            if let Err(e) = unsafe { signal::sigaction(*sig, old) } {
                warn!(
                    event = "core.process.signal_restore_failed",
                    signal = %sig,
                    error = %e
                );
            }
        }
    }

    pub fn interrupted() -> bool {
        INTERRUPTED.load(Ordering::SeqCst)
    }

    pub fn interrupt_signal() -> Option<i32> {
        match LAST_SIGNAL.load(Ordering::SeqCst) {
            0 => None,
            sig => Some(sig),
        }
    }

    pub fn current_child() -> Option<u32> {
        match CHILD_PID.load(Ordering::SeqCst) {
            pid if pid > 0 => u32::try_from(pid).ok(),
            _ => None,
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use crate::process::errors::SpawnError;

    /// No-op outside unix: console control events reach the whole process group.
    pub struct ForwardGuard;

    impl ForwardGuard {
        pub fn install() -> Result<Self, SpawnError> {
            Ok(Self)
        }

        pub fn set_child(&mut self, _pid: u32) {}
    }

    pub fn interrupted() -> bool {
        false
    }

    pub fn interrupt_signal() -> Option<i32> {
        None
    }

    pub fn current_child() -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_installs_and_restores() {
        let guard = ForwardGuard::install().unwrap();
        drop(guard);
    }

    #[test]
    fn test_nested_guards() {
        let outer = ForwardGuard::install().unwrap();
        let inner = ForwardGuard::install().unwrap();
        drop(inner);
        drop(outer);
    }
}
