//! Envschema - typed configuration from environment variables
//!
//! Envschema maps a declarative, nested configuration schema onto a flat
//! table of environment-variable strings. Each bound leaf is coerced to its
//! declared kind, the values are reassembled into a nested tree, and the tree
//! is validated against the full schema. Every violation is reported at once
//! in a single [`AggregatedError`].
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): schema model, env bindings, issues and errors
//! - **Service Layer** (`services`): walker, resolver, coercion, tree builder, validator
//! - **Infrastructure Layer** (`infrastructure`): environment snapshots, loader, figment glue
//!
//! # Example
//!
//! ```
//! use envschema::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     port: u16,
//!     host: String,
//! }
//!
//! let schema = object()
//!     .field("port", number().env("PORT").with_default(3000))
//!     .field("host", string().env("DB_HOST").with_default("localhost"))
//!     .into_schema();
//!
//! let env = Environment::from([("PORT", "8080")]);
//! let server: Server = load_config(&schema, &env)?;
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.host, "localhost");
//! # Ok::<(), envschema::ConfigError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AggregatedError, CastFn, EnvBinding, IntoSchema, LeafKind, SchemaNode, ValidationIssue,
};
pub use domain::{ConfigError, ConfigResult, EnvSource};
pub use infrastructure::config::{
    load_config, load_config_with_base, load_from_process_env, validate_config, ConfigLoader,
    LoaderOptions, SchemaProvider,
};
pub use infrastructure::env::Environment;
pub use services::{coerce_env_value, RawConfigTree};

/// Everything needed to declare a schema and load it.
pub mod prelude {
    pub use crate::domain::models::{
        array, boolean, enumeration, number, object, string, IntoSchema, SchemaNode,
    };
    pub use crate::{
        load_config, load_config_with_base, load_from_process_env, validate_config, ConfigError,
        ConfigLoader, Environment, LoaderOptions,
    };
}
