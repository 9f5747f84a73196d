//! Domain layer for envschema
//!
//! Schema model, env bindings, validation issues and the error taxonomy.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ConfigError, ConfigResult};
pub use ports::EnvSource;
