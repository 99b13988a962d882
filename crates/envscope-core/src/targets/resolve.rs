use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::errors::TargetError;
use super::types::TargetDefinition;
use crate::env::Environment;

/// Locate the executable for `target` using `env` (normally the
/// intermediary's own environment).
///
/// Resolution order:
/// 1. the target's override variable, if set and the path exists;
/// 2. the executable name on `env`'s `PATH`;
/// 3. the fallback install paths, in order.
pub fn resolve_executable(
    target: &TargetDefinition,
    env: &Environment,
    cwd: &Path,
) -> Result<PathBuf, TargetError> {
    let mut tried = Vec::new();

    if let Some(var) = target.executable_var() {
        tried.push(format!("${}", var));
        if let Some(value) = env.get(var).map(str::trim)
            && !value.is_empty()
        {
            let explicit = PathBuf::from(value);
            if explicit.exists() {
                info!(
                    event = "core.targets.resolve_completed",
                    target = target.name(),
                    source = "variable",
                    path = %explicit.display()
                );
                return Ok(explicit);
            }
            warn!(
                event = "core.targets.resolve_variable_missing",
                target = target.name(),
                var = var,
                path = %explicit.display()
            );
        }
    }

    tried.push(format!("{} on PATH", target.executable()));
    match which::which_in(target.executable(), env.get_os("PATH"), cwd) {
        Ok(found) => {
            info!(
                event = "core.targets.resolve_completed",
                target = target.name(),
                source = "path",
                path = %found.display()
            );
            return Ok(found);
        }
        Err(e) => {
            debug!(
                event = "core.targets.resolve_path_failed",
                target = target.name(),
                error = %e
            );
        }
    }

    for candidate in target.fallback_paths() {
        tried.push(candidate.display().to_string());
        if candidate.exists() {
            info!(
                event = "core.targets.resolve_completed",
                target = target.name(),
                source = "fallback",
                path = %candidate.display()
            );
            return Ok(candidate.clone());
        }
    }

    Err(TargetError::ExecutableNotFound {
        target: target.name().to_string(),
        tried: tried.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_override_variable_wins() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("Code.exe");
        std::fs::write(&exe, "").unwrap();

        let target = TargetDefinition::new("vscode", "code").with_executable_var("VSCODE_EXE");
        let env: Environment = [("VSCODE_EXE", exe.display().to_string())]
            .into_iter()
            .collect();

        let resolved = resolve_executable(&target, &env, dir.path()).unwrap();
        assert_eq!(resolved, exe);
    }

    #[cfg(unix)]
    #[test]
    fn test_found_on_snapshot_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = make_executable(dir.path(), "fake-editor");

        let target = TargetDefinition::new("fake", "fake-editor");
        let env: Environment = [("PATH", dir.path().display().to_string())]
            .into_iter()
            .collect();

        let resolved = resolve_executable(&target, &env, dir.path()).unwrap();
        assert_eq!(resolved, exe);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_override_falls_back_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = make_executable(dir.path(), "fake-editor");

        let target =
            TargetDefinition::new("fake", "fake-editor").with_executable_var("FAKE_EXE");
        let env: Environment = [
            ("FAKE_EXE", "/definitely/not/here".to_string()),
            ("PATH", dir.path().display().to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve_executable(&target, &env, dir.path()).unwrap(), exe);
    }

    #[test]
    fn test_fallback_path_used() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("Code.exe");
        std::fs::write(&fallback, "").unwrap();

        let target = TargetDefinition::new("vscode", "envscope-no-such-binary")
            .with_fallback_paths(vec![dir.path().join("missing.exe"), fallback.clone()]);

        let resolved = resolve_executable(&target, &Environment::default(), dir.path()).unwrap();
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn test_not_found_lists_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetDefinition::new("vscode", "envscope-no-such-binary")
            .with_executable_var("VSCODE_EXE")
            .with_fallback_paths(vec![dir.path().join("missing.exe")]);

        let err = resolve_executable(&target, &Environment::default(), dir.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("$VSCODE_EXE"));
        assert!(msg.contains("envscope-no-such-binary on PATH"));
        assert!(msg.contains("missing.exe"));
    }
}
