//! Common test utilities for integration tests
//!
//! Provides shared schemas and logging setup used across
//! multiple integration test files.

use envschema::prelude::*;
use serde::Deserialize;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Server configuration with a nested database section.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    #[serde(rename = "testArray")]
    pub test_array: Vec<String>,
}

/// Database section of [`ServerConfig`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Schema for [`ServerConfig`], every leaf bound and defaulted.
#[allow(dead_code)]
pub fn server_schema() -> SchemaNode {
    object()
        .field("port", number().int().positive().env("PORT").with_default(3000))
        .field(
            "database",
            object()
                .field("host", string().env("DB_HOST").with_default("localhost"))
                .field("port", number().int().env("DB_PORT").with_default(5432))
                .field("username", string().env("DB_USER").with_default("root"))
                .field("password", string().env("DB_PASS").with_default("password"))
                .with_default(serde_json::json!({})),
        )
        .field(
            "testArray",
            array(string())
                .env("TEST_ARRAY_VAR")
                .with_default(serde_json::json!(["valuex"])),
        )
        .into_schema()
}
