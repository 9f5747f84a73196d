//! Loading against the real process environment.
//!
//! Variables are scoped with `temp_env`, which serializes access to the
//! process table across tests.

mod common;

use common::{server_schema, ServerConfig};
use envschema::prelude::*;
use envschema::SchemaProvider;
use figment::providers::Serialized;
use figment::Figment;
use serde::Deserialize;

#[test]
fn test_load_from_process_env() {
    common::setup_test_logging();

    temp_env::with_vars(
        [
            ("PORT", Some("9090")),
            ("DB_USER", Some("admin")),
            ("DB_HOST", None),
            ("DB_PORT", None),
            ("DB_PASS", None),
            ("TEST_ARRAY_VAR", Some("x,y")),
        ],
        || {
            let config: ServerConfig = load_from_process_env(&server_schema()).unwrap();
            assert_eq!(config.port, 9090);
            assert_eq!(config.database.username, "admin");
            assert_eq!(config.database.host, "localhost");
            assert_eq!(config.test_array, vec!["x", "y"]);
        },
    );
}

#[test]
fn test_snapshot_does_not_follow_later_mutation() {
    let schema = object()
        .field("port", number().env("PORT").with_default(3000))
        .into_schema();

    let env = temp_env::with_var("PORT", Some("1111"), Environment::from_process);
    temp_env::with_var("PORT", Some("2222"), || {
        let value = ConfigLoader::new().load_value(&schema, &env).unwrap();
        assert_eq!(value, serde_json::json!({"port": 1111}));
    });
}

#[test]
fn test_loader_options_from_env() {
    temp_env::with_vars(
        [
            ("ENVSCHEMA_PREFIX", Some("SVC_")),
            ("SVC_PORT", Some("7000")),
            ("PORT", Some("1")),
        ],
        || {
            let loader = ConfigLoader::from_env_options().unwrap();
            let schema = object()
                .field("port", number().env("PORT"))
                .into_schema();
            let value = loader
                .load_value(&schema, &Environment::from_process())
                .unwrap();
            assert_eq!(value, serde_json::json!({"port": 7000}));
        },
    );
}

#[test]
fn test_schema_provider_in_figment_stack() {
    #[derive(Debug, Deserialize)]
    struct Settings {
        port: u16,
        host: String,
    }

    temp_env::with_vars([("PORT", Some("4000")), ("DB_HOST", None::<&str>)], || {
        let schema = object()
            .field("port", number().env("PORT").with_default(3000))
            .field("host", string().env("DB_HOST").with_default("localhost"))
            .into_schema();

        let figment = Figment::new()
            .merge(Serialized::defaults(serde_json::json!({"host": "file-host", "port": 1})))
            .merge(SchemaProvider::new(schema.clone()));
        let settings: Settings = ConfigLoader::new().extract(&schema, &figment).unwrap();
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.host, "file-host");
    });
}
