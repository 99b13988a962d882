use super::types::TargetDefinition;

/// A target with built-in knowledge of how it is installed and launched.
///
/// Config files can override any field of the definition a backend returns.
pub trait TargetBackend: Send + Sync {
    /// The registered target name.
    fn name(&self) -> &'static str;

    /// The display name for user-facing messages.
    fn display_name(&self) -> &'static str;

    /// Alternative names accepted on the command line.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// The definition used when the config file says nothing about this target.
    fn default_definition(&self, env: &crate::env::Environment) -> TargetDefinition;
}
