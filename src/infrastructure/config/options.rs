//! Options that tune the loader itself.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::models::issue::DEFAULT_HEADER;
use crate::domain::ConfigResult;

/// Prefix of the variables that configure the loader itself.
pub const OPTIONS_ENV_PREFIX: &str = "ENVSCHEMA_";

/// Options controlling how a [`ConfigLoader`](super::ConfigLoader) runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Prepended to every bound variable name at lookup time.
    #[serde(default)]
    pub prefix: Option<String>,

    /// First line of a rendered validation failure.
    #[serde(default = "default_header")]
    pub header: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            header: default_header(),
        }
    }
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

impl LoaderOptions {
    /// Load options with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. Environment variables (`ENVSCHEMA_*` prefix)
    pub fn load() -> ConfigResult<Self> {
        Self::from_figment(
            &Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Env::prefixed(OPTIONS_ENV_PREFIX)),
        )
    }

    /// Extract options from a caller-assembled figment.
    pub fn from_figment(figment: &Figment) -> ConfigResult<Self> {
        Ok(figment.extract()?)
    }

    /// Set the variable name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the failure header line.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoaderOptions::default();
        assert_eq!(options.prefix, None);
        assert_eq!(options.header, "Configuration validation failed:");
    }

    #[test]
    fn test_env_overrides_defaults() {
        temp_env::with_vars(
            [
                ("ENVSCHEMA_PREFIX", Some("APP_")),
                ("ENVSCHEMA_HEADER", Some("Bad settings:")),
            ],
            || {
                let options = LoaderOptions::load().unwrap();
                assert_eq!(options.prefix.as_deref(), Some("APP_"));
                assert_eq!(options.header, "Bad settings:");
            },
        );
    }

    #[test]
    fn test_load_without_env_uses_defaults() {
        temp_env::with_vars_unset(["ENVSCHEMA_PREFIX", "ENVSCHEMA_HEADER"], || {
            assert_eq!(LoaderOptions::load().unwrap(), LoaderOptions::default());
        });
    }

    #[test]
    fn test_builder_methods() {
        let options = LoaderOptions::default()
            .with_prefix("SVC_")
            .with_header("Invalid:");
        assert_eq!(options.prefix.as_deref(), Some("SVC_"));
        assert_eq!(options.header, "Invalid:");
    }
}
