//! Boundary traits between the pipeline and the outside world.

use std::collections::{BTreeMap, HashMap};

/// Read-only view of an environment-variable table.
///
/// The loader reads each bound name at most once per invocation and never
/// writes. Implementations decide whether they snapshot or read live.
pub trait EnvSource {
    /// Look up a variable by name.
    fn var(&self, name: &str) -> Option<&str>;
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<&str> {
        (**self).var(name)
    }
}
