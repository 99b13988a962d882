//! A signal caught by the forwarding handlers before a child exists. Own test
//! binary: the interrupt flag is process-global.
#![cfg(unix)]

use envscope_core::launch::{LaunchSpec, PropagationMode, WaitMode};
use envscope_core::process::{self, ForwardGuard, SpawnError, signals};
use envscope_core::Environment;
use nix::sys::signal::{Signal, raise};

#[test]
fn signal_with_no_child_registered_prevents_the_spawn() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("started");
    let spec = LaunchSpec::new(
        "/bin/sh",
        vec![
            "-c".to_string(),
            format!("touch '{}'", marker.display()),
        ],
        Environment::default(),
        PropagationMode::Scoped,
        WaitMode::Wait,
    );

    let guard = ForwardGuard::install().unwrap();
    raise(Signal::SIGINT).unwrap();
    assert!(signals::interrupted());
    assert_eq!(signals::current_child(), None);

    let err = process::start(&spec).err().unwrap();
    assert!(matches!(err, SpawnError::Interrupted { signal } if signal == Signal::SIGINT as i32));
    drop(guard);

    assert!(!marker.exists());
}
