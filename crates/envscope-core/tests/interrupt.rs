//! Signal forwarding. Lives in its own test binary: the interrupt flag is
//! process-global and would leak into unrelated tests.
#![cfg(unix)]

use std::time::{Duration, Instant};

use envscope_core::launch::{LaunchResult, LaunchSpec, PropagationMode, WaitMode};
use envscope_core::process::{self, SpawnError, signals};
use envscope_core::{Environment, LaunchError};
use nix::sys::signal::{Signal, raise};

fn sleeper() -> LaunchSpec {
    LaunchSpec::new(
        "/bin/sh",
        vec!["-c".to_string(), "sleep 30".to_string()],
        Environment::default(),
        PropagationMode::Scoped,
        WaitMode::Wait,
    )
}

#[test]
fn forwarded_signal_stops_child_and_blocks_further_launches() {
    let waiter = std::thread::spawn(|| process::spawn(&sleeper()));

    let deadline = Instant::now() + Duration::from_secs(10);
    while signals::current_child().is_none() {
        assert!(Instant::now() < deadline, "child never registered");
        std::thread::sleep(Duration::from_millis(10));
    }

    raise(Signal::SIGTERM).unwrap();

    let result = waiter.join().unwrap().unwrap();
    assert_eq!(result, LaunchResult::Signaled(Signal::SIGTERM as i32));
    assert!(signals::interrupted());

    let err = process::spawn(&sleeper()).unwrap_err();
    assert!(matches!(err, SpawnError::Interrupted { signal } if signal == Signal::SIGTERM as i32));
    assert_eq!(LaunchError::from(err).exit_code(), 128 + Signal::SIGTERM as i32);
}
