//! Configuration loading infrastructure
//!
//! Schema-driven loading from environment snapshots:
//! - Binding discovery, coercion and validation in one pass
//! - Loader options from `ENVSCHEMA_*` variables via figment
//! - Layering env values over a caller-supplied base
//! - A figment provider for merging env-derived configuration

pub mod loader;
pub mod options;
pub mod provider;

pub use loader::{
    load_config, load_config_with_base, load_from_process_env, validate_config, ConfigLoader,
};
pub use options::LoaderOptions;
pub use provider::SchemaProvider;
