use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use tracing::debug;

/// Whether variable names match regardless of ASCII case on this platform.
pub(crate) const NAMES_IGNORE_CASE: bool = cfg!(windows);

/// An immutable mapping of environment variable names to values.
///
/// Names and values are kept exactly as the OS reported them, including
/// entries that are not valid Unicode. Names are unique. Lookups by name
/// ignore ASCII case on Windows and are exact elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    pub(crate) fn from_map(vars: BTreeMap<OsString, OsString>) -> Self {
        Self { vars }
    }

    /// The value of `name` as text. `None` when absent or not valid Unicode.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_os(name).and_then(OsStr::to_str)
    }

    /// The raw value of `name`.
    pub fn get_os(&self, name: &str) -> Option<&OsStr> {
        self.entry(name).map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Names in order, lossily converted for display.
    pub fn names(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.vars.keys().map(|k| k.to_string_lossy())
    }

    /// Every variable in `self` is present in `other` with the same value.
    pub fn is_subset_of(&self, other: &Environment) -> bool {
        self.vars
            .iter()
            .all(|(name, value)| other.vars.get(name) == Some(value))
    }

    /// The stored entry for `name`, with the name spelled as the OS reported it.
    pub(crate) fn entry(&self, name: &str) -> Option<(&OsStr, &OsStr)> {
        self.find_entry(OsStr::new(name), NAMES_IGNORE_CASE)
    }

    fn find_entry(&self, name: &OsStr, ignore_case: bool) -> Option<(&OsStr, &OsStr)> {
        if let Some((k, v)) = self.vars.get_key_value(name) {
            return Some((k.as_os_str(), v.as_os_str()));
        }
        if !ignore_case {
            return None;
        }
        self.vars
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Capture the current process environment.
///
/// The returned value is a copy: later changes to the process environment do
/// not affect it. Every entry is kept byte for byte.
pub fn capture() -> Environment {
    let env = capture_from(std::env::vars_os());
    debug!(event = "core.env.capture_completed", count = env.len());
    env
}

pub(crate) fn capture_from<I>(vars: I) -> Environment
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    Environment::from_map(vars.into_iter().collect())
}
