use std::path::PathBuf;

use crate::env::Environment;
use crate::targets::traits::TargetBackend;
use crate::targets::types::TargetDefinition;

/// Variable naming a VS Code executable in a non-standard location.
pub const VSCODE_EXE_VAR: &str = "VSCODE_EXE";

pub struct VSCodeBackend;

impl TargetBackend for VSCodeBackend {
    fn name(&self) -> &'static str {
        "vscode"
    }

    fn display_name(&self) -> &'static str {
        "VS Code"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn default_definition(&self, env: &Environment) -> TargetDefinition {
        TargetDefinition::new(self.name(), "code")
            .with_executable_var(VSCODE_EXE_VAR)
            .with_fallback_paths(install_locations(env))
            .with_bundles(true)
    }
}

/// Standard per-user and system-wide install locations.
fn install_locations(env: &Environment) -> Vec<PathBuf> {
    if !cfg!(windows) {
        return Vec::new();
    }

    let mut paths = Vec::new();
    if let Some(local) = env.get("LOCALAPPDATA")
        && !local.is_empty()
    {
        paths.push(
            PathBuf::from(local)
                .join("Programs")
                .join("Microsoft VS Code")
                .join("Code.exe"),
        );
    }
    paths.push(PathBuf::from("C:/Program Files/Microsoft VS Code/Code.exe"));
    paths
}
