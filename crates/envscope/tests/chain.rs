//! End-to-end tests running the launcher, the wrapper and a shell target.
#![cfg(unix)]

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use predicates::prelude::*;

fn envscope() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("envscope").expect("binary `envscope` should be built")
}

fn wrapper_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_envscope-wrapper"))
}

/// A config whose `shell` target is `sh` with `KEEP` and `PATH` passed through.
fn write_config(dir: &Path, intermediary: &[String]) -> PathBuf {
    let list = intermediary
        .iter()
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(", ");
    let body = format!(
        r#"
[launcher]
intermediary = [{list}]

[targets.shell]
executable = "sh"

[targets.shell.environment]
pass = ["KEEP", "PATH"]
set = {{ FIXED = "1" }}
"#
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn wrapper_config(dir: &Path) -> PathBuf {
    write_config(dir, &[wrapper_path().display().to_string()])
}

fn caller(cmd: &mut Command) -> &mut Command {
    cmd.env("KEEP", "kept")
        .env("SECRET_TOKEN", "hunter2")
        .env_remove("ENVSCOPE_CONFIG")
}

#[test]
fn exit_code_passes_through_the_chain() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());

    caller(&mut envscope())
        .arg("--config")
        .arg(&config)
        .args(["shell", "--", "-c", "exit 3"])
        .assert()
        .code(3);
}

#[test]
fn arguments_reach_target_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());
    let out = dir.path().join("args.txt");

    caller(&mut envscope())
        .arg("--config")
        .arg(&config)
        .args(["shell", "--", "-c", r#"printf '%s\n' "$@" > "$0""#])
        .arg(&out)
        .args(["first", "with space", "--flag"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "first\nwith space\n--flag\n"
    );
}

#[test]
fn target_env_is_identical_with_and_without_inherit() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());
    let scoped_out = dir.path().join("scoped.txt");
    let inherit_out = dir.path().join("inherit.txt");

    for (out, inherit) in [(&scoped_out, false), (&inherit_out, true)] {
        let mut cmd = envscope();
        caller(&mut cmd).arg("--config").arg(&config);
        if inherit {
            cmd.arg("--inherit-env");
        }
        cmd.args(["shell", "--", "-c", r#"env | sort > "$0""#])
            .arg(out)
            .assert()
            .success();
    }

    let scoped = std::fs::read_to_string(&scoped_out).unwrap();
    let inherited = std::fs::read_to_string(&inherit_out).unwrap();
    assert_eq!(scoped, inherited);
    assert!(scoped.contains("KEEP=kept"));
    assert!(scoped.contains("FIXED=1"));
    assert!(!scoped.contains("SECRET_TOKEN"));
}

#[test]
fn scoped_intermediary_does_not_see_undeclared_vars() {
    let dir = tempfile::tempdir().unwrap();
    let scoped_out = dir.path().join("scoped.txt");
    let inherit_out = dir.path().join("inherit.txt");

    for (out, inherit) in [(&scoped_out, false), (&inherit_out, true)] {
        let script = format!("env > {:?}", out.display().to_string());
        let config = write_config(
            dir.path(),
            &["/bin/sh".to_string(), "-c".to_string(), script, "wrapper".to_string()],
        );
        let mut cmd = envscope();
        caller(&mut cmd).arg("--config").arg(&config);
        if inherit {
            cmd.arg("--inherit-env");
        }
        cmd.arg("shell").assert().success();
    }

    let scoped = std::fs::read_to_string(&scoped_out).unwrap();
    let inherited = std::fs::read_to_string(&inherit_out).unwrap();
    assert!(scoped.contains("KEEP=kept"));
    assert!(!scoped.contains("SECRET_TOKEN"));
    assert!(inherited.contains("SECRET_TOKEN=hunter2"));
}

#[test]
fn unknown_target_exits_with_launcher_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());

    caller(&mut envscope())
        .arg("--config")
        .arg(&config)
        .arg("doesnotexist")
        .assert()
        .code(125)
        .stderr(predicate::str::contains("doesnotexist"));
}

#[test]
fn missing_explicit_config_exits_with_launcher_code() {
    caller(&mut envscope())
        .args(["--config", "/nonexistent/envscope.toml", "shell"])
        .assert()
        .code(125);
}

#[test]
fn missing_target_argument_is_usage_error() {
    envscope().assert().code(2);
}

#[test]
fn list_targets_includes_builtins_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());

    caller(&mut envscope())
        .arg("--config")
        .arg(&config)
        .arg("--list-targets")
        .assert()
        .success()
        .stdout(predicate::str::contains("vscode"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn dry_run_prints_plan_without_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());

    caller(&mut envscope())
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "shell", "--", "-c", "exit 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target:       shell"))
        .stdout(predicate::str::contains("KEEP"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn non_unicode_caller_variable_does_not_stop_the_launch() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());

    caller(&mut envscope())
        .env("UNRELATED_LATIN1", OsStr::from_bytes(b"caf\xe9"))
        .arg("--config")
        .arg(&config)
        .args(["shell", "--", "-c", "exit 0"])
        .assert()
        .success();
}

/// Start the launcher, let it reach `shell`'s command, then send SIGTERM.
fn terminate_launcher(config: &Path, script: &str) -> std::process::ExitStatus {
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_envscope"))
        .env_remove("ENVSCOPE_CONFIG")
        .arg("--config")
        .arg(config)
        .args(["shell", "--", "-c", script])
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(500));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
    child.wait().unwrap()
}

#[test]
fn terminating_the_launcher_stops_a_running_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = wrapper_config(dir.path());
    let marker = dir.path().join("finished");

    let status = terminate_launcher(
        &config,
        &format!("sleep 30; touch {:?}", marker.display().to_string()),
    );

    assert_eq!(status.code(), Some(143));
    assert!(!marker.exists());
}

#[test]
fn terminating_the_launcher_before_the_target_spawns_starts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("target-started");
    let config = write_config(
        dir.path(),
        &[
            "/bin/sh".to_string(),
            "-c".to_string(),
            format!("sleep 30; touch {:?}", marker.display().to_string()),
            "wrapper".to_string(),
        ],
    );

    let status = terminate_launcher(&config, "exit 0");

    assert_eq!(status.code(), Some(143));
    assert!(!marker.exists());
}
