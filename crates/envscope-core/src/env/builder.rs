use std::collections::BTreeMap;
use std::ffi::OsString;

use envscope_config::is_valid_env_name;
use tracing::debug;

use super::errors::EnvError;
use super::snapshot::{Environment, NAMES_IGNORE_CASE};

/// Builds a scoped [`Environment`] starting from an empty base.
///
/// The builder can only add variables. A name that was never passed through
/// or set cannot end up in the result, whatever the source environment holds.
/// Later additions of the same name replace earlier ones.
#[derive(Debug, Default)]
pub struct ScopedEnvBuilder {
    vars: BTreeMap<OsString, OsString>,
}

impl ScopedEnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `name` from `source` if it is present there.
    ///
    /// The value is copied byte for byte and keeps the spelling `source` uses
    /// for the name.
    pub fn pass_through(mut self, name: &str, source: &Environment) -> Result<Self, EnvError> {
        validate_name(name)?;
        match source.entry(name) {
            Some((key, value)) => self.insert(key.to_os_string(), value.to_os_string()),
            None => {
                debug!(event = "core.env.pass_through_absent", name = name);
            }
        }
        Ok(self)
    }

    pub fn pass_through_all<I, S>(self, names: I, source: &Environment) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .try_fold(self, |builder, name| builder.pass_through(name.as_ref(), source))
    }

    /// Add an explicit value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self, EnvError> {
        let name = name.into();
        validate_name(&name)?;
        self.insert(OsString::from(name), OsString::from(value.into()));
        Ok(self)
    }

    pub fn build(self) -> Environment {
        Environment::from_map(self.vars)
    }

    fn insert(&mut self, name: OsString, value: OsString) {
        if NAMES_IGNORE_CASE {
            self.vars.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        }
        self.vars.insert(name, value);
    }
}

fn validate_name(name: &str) -> Result<(), EnvError> {
    if is_valid_env_name(name) {
        Ok(())
    } else {
        Err(EnvError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller_env() -> Environment {
        [
            ("PATH", "/usr/bin"),
            ("HOME", "/home/dev"),
            ("SECRET_TOKEN", "hunter2"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_builder_builds_empty_environment() {
        assert!(ScopedEnvBuilder::new().build().is_empty());
    }

    #[test]
    fn test_pass_through_copies_only_named_variables() {
        let env = ScopedEnvBuilder::new()
            .pass_through("PATH", &caller_env())
            .unwrap()
            .build();
        assert_eq!(env.get("PATH"), Some("/usr/bin"));
        assert!(!env.contains("SECRET_TOKEN"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_pass_through_skips_absent_names() {
        let env = ScopedEnvBuilder::new()
            .pass_through_all(["DISPLAY", "HOME"], &caller_env())
            .unwrap()
            .build();
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["HOME"]);
    }

    #[test]
    fn test_set_overrides_pass_through() {
        let env = ScopedEnvBuilder::new()
            .pass_through("HOME", &caller_env())
            .unwrap()
            .set("HOME", "/srv/editor")
            .unwrap()
            .build();
        assert_eq!(env.get("HOME"), Some("/srv/editor"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let err = ScopedEnvBuilder::new().set("NOT-VALID", "x").unwrap_err();
        assert!(matches!(err, EnvError::InvalidName { ref name } if name == "NOT-VALID"));

        let err = ScopedEnvBuilder::new()
            .pass_through("", &caller_env())
            .unwrap_err();
        assert!(matches!(err, EnvError::InvalidName { .. }));
    }

    #[test]
    fn test_result_is_subset_of_source_when_only_passing_through() {
        let source = caller_env();
        let env = ScopedEnvBuilder::new()
            .pass_through_all(["PATH", "HOME", "MISSING"], &source)
            .unwrap()
            .build();
        assert!(env.is_subset_of(&source));
    }

    #[cfg(unix)]
    #[test]
    fn test_pass_through_keeps_non_unicode_value() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let source: Environment = [(
            OsString::from("LATIN1"),
            OsString::from_vec(b"caf\xe9".to_vec()),
        )]
        .into_iter()
        .collect();
        let env = ScopedEnvBuilder::new()
            .pass_through("LATIN1", &source)
            .unwrap()
            .build();
        assert_eq!(env, source);
        assert_eq!(env.get_os("LATIN1").unwrap().as_bytes(), b"caf\xe9");
    }

    #[cfg(windows)]
    #[test]
    fn test_set_replaces_differently_cased_name_on_windows() {
        let source: Environment = [("Path", "C:\\Windows"), ("SECRET", "x")]
            .into_iter()
            .collect();
        let env = ScopedEnvBuilder::new()
            .pass_through("PATH", &source)
            .unwrap()
            .set("path", "C:\\Tools")
            .unwrap()
            .build();

        assert_eq!(env.len(), 1);
        assert_eq!(env.get("PATH"), Some("C:\\Tools"));
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["path"]);
    }

    #[cfg(windows)]
    #[test]
    fn test_pass_through_path_keeps_os_spelling_on_windows() {
        let source: Environment = [("Path", "C:\\Windows")].into_iter().collect();
        let env = ScopedEnvBuilder::new()
            .pass_through("PATH", &source)
            .unwrap()
            .build();
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["Path"]);
        assert_eq!(env.get("PATH"), Some("C:\\Windows"));
    }
}
