//! Errors surfaced by configuration loading.

use thiserror::Error;

use crate::domain::models::issue::AggregatedError;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more schema violations, aggregated in encounter order.
    #[error("{0}")]
    Validation(AggregatedError),

    /// The validated value could not be deserialized into the target type.
    #[error(transparent)]
    Extract(#[from] serde_json::Error),

    /// Loader options could not be extracted.
    #[error("Failed to extract loader options: {0}")]
    Options(Box<figment::Error>),

    /// A merged figment stack could not be read as a configuration tree.
    #[error("Failed to read configuration sources: {0}")]
    Sources(Box<figment::Error>),
}

impl ConfigError {
    /// The aggregated issues, when this is a validation failure.
    pub const fn validation(&self) -> Option<&AggregatedError> {
        match self {
            Self::Validation(aggregated) => Some(aggregated),
            _ => None,
        }
    }
}

impl From<AggregatedError> for ConfigError {
    fn from(err: AggregatedError) -> Self {
        Self::Validation(err)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Options(Box::new(err))
    }
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
