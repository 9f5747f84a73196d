//! Figment integration.

use figment::providers::Serialized;
use figment::value::{Dict, Map};
use figment::{Error, Metadata, Profile, Provider};

use super::loader::ConfigLoader;
use crate::domain::models::SchemaNode;
use crate::infrastructure::env::Environment;

/// Figment provider backed by a schema-resolved environment.
///
/// Contributes only the leaves whose variables are set, coerced per kind,
/// so values from lower layers survive when the environment is silent.
/// Schema defaults and validation are applied once the stack is merged,
/// through [`ConfigLoader::extract`].
#[derive(Debug, Clone)]
pub struct SchemaProvider {
    schema: SchemaNode,
    env: Environment,
    loader: ConfigLoader,
}

impl SchemaProvider {
    /// Provider over a snapshot of the process environment.
    pub fn new(schema: SchemaNode) -> Self {
        Self::with_env(schema, Environment::from_process())
    }

    /// Provider over an explicit snapshot.
    pub fn with_env(schema: SchemaNode, env: Environment) -> Self {
        Self {
            schema,
            env,
            loader: ConfigLoader::new(),
        }
    }

    /// Use a configured loader for prefixes and casts.
    #[must_use]
    pub fn loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = loader;
        self
    }
}

impl Provider for SchemaProvider {
    fn metadata(&self) -> Metadata {
        Metadata::named("envschema")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let tree = self.loader.raw_tree(&self.schema, &self.env);
        Serialized::defaults(tree.into_value()).data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{number, object, string, IntoSchema};
    use figment::Figment;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct AppConfig {
        name: String,
        port: u16,
    }

    fn schema() -> SchemaNode {
        object()
            .field("port", number().env("PORT").with_default(3000))
            .into_schema()
    }

    fn base() -> Serialized<AppConfig> {
        Serialized::defaults(AppConfig {
            name: "svc".to_string(),
            port: 1,
        })
    }

    #[test]
    fn test_provider_overrides_lower_layers() {
        let config: AppConfig = Figment::new()
            .merge(base())
            .merge(SchemaProvider::with_env(
                schema(),
                Environment::from([("PORT", "8080")]),
            ))
            .extract()
            .unwrap();

        assert_eq!(
            config,
            AppConfig {
                name: "svc".to_string(),
                port: 8080
            }
        );
    }

    #[test]
    fn test_unset_variable_keeps_lower_layer_value() {
        let figment = Figment::new()
            .merge(base())
            .merge(SchemaProvider::with_env(schema(), Environment::new()));

        let config: AppConfig = figment.extract().unwrap();
        assert_eq!(config.port, 1);

        let schema = object()
            .field("name", string())
            .field("port", number().env("PORT").with_default(3000))
            .into_schema();
        let config: AppConfig = ConfigLoader::new().extract(&schema, &figment).unwrap();
        assert_eq!(config.port, 1);
    }

    #[test]
    fn test_schema_default_applies_after_merge() {
        let figment =
            Figment::new().merge(SchemaProvider::with_env(schema(), Environment::new()));

        let value: serde_json::Value = ConfigLoader::new().extract(&schema(), &figment).unwrap();
        assert_eq!(value, serde_json::json!({"port": 3000}));
    }

    #[test]
    fn test_provider_uses_loader_prefix() {
        let loader =
            ConfigLoader::with_options(crate::LoaderOptions::default().with_prefix("APP_"));
        let figment = Figment::new().merge(
            SchemaProvider::with_env(schema(), Environment::from([("APP_PORT", "9")]))
                .loader(loader),
        );
        let value: serde_json::Value = figment.extract().unwrap();
        assert_eq!(value, serde_json::json!({"port": 9}));
    }

    #[test]
    fn test_validation_failure_after_merge() {
        let schema = object().field("name", string()).into_schema();
        let figment =
            Figment::new().merge(SchemaProvider::with_env(schema.clone(), Environment::new()));

        let err = ConfigLoader::new()
            .extract::<AppConfig>(&schema, &figment)
            .unwrap_err();
        assert_eq!(err.validation().unwrap().paths(), vec!["name"]);
        assert!(err
            .to_string()
            .contains("- name: Expected string, received undefined"));
    }
}
