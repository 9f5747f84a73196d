//! The load pipeline and its free-function entry points.

use figment::Figment;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

use super::options::LoaderOptions;
use crate::domain::models::{CastFn, EnvBinding, SchemaNode};
use crate::domain::ports::EnvSource;
use crate::domain::{ConfigError, ConfigResult};
use crate::infrastructure::env::Environment;
use crate::services::coercion::coerce_env_value;
use crate::services::tree_builder::RawConfigTree;
use crate::services::{SchemaValidator, SchemaWalker};

/// Loads typed configuration from a schema and an environment snapshot.
///
/// One load runs a single synchronous pass:
/// 1. Discover env bindings in the schema
/// 2. Read and coerce each bound variable
/// 3. Assemble the raw tree, optionally over a caller-supplied base
/// 4. Validate the tree, aggregating every issue
///
/// The loader holds no state between loads.
#[derive(Clone, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
    casts: BTreeMap<String, CastFn>,
    walker: SchemaWalker,
    validator: SchemaValidator,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("options", &self.options)
            .field("casts", &self.casts.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ConfigLoader {
    /// Loader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with explicit options.
    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Loader whose options come from `ENVSCHEMA_*` variables.
    pub fn from_env_options() -> ConfigResult<Self> {
        Ok(Self::with_options(LoaderOptions::load()?))
    }

    /// Replace the per-kind coercion of the variable bound as `env_var_name`.
    ///
    /// The name is the one declared in the schema, before any prefix.
    #[must_use]
    pub fn with_cast<F>(mut self, env_var_name: impl Into<String>, cast: F) -> Self
    where
        F: Fn(Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.casts.insert(env_var_name.into(), Arc::new(cast));
        self
    }

    /// The active options.
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Env bindings discovered in `schema`, in field order.
    pub fn bindings(&self, schema: &SchemaNode) -> Vec<EnvBinding> {
        self.walker.bindings(schema)
    }

    /// Read, coerce and assemble the raw tree for `schema`, without validating it.
    pub fn raw_tree<E>(&self, schema: &SchemaNode, env: &E) -> RawConfigTree
    where
        E: EnvSource + ?Sized,
    {
        self.overlay(RawConfigTree::new(), schema, env)
    }

    /// Like [`raw_tree`](Self::raw_tree), but env-derived values are laid
    /// over `base`.
    ///
    /// Each bound leaf takes its env value when the variable is set and keeps
    /// the base value otherwise. Base values are not coerced.
    pub fn raw_tree_with_base<E>(
        &self,
        schema: &SchemaNode,
        env: &E,
        base: &Value,
    ) -> RawConfigTree
    where
        E: EnvSource + ?Sized,
    {
        self.overlay(RawConfigTree::from_base(base), schema, env)
    }

    /// Load and validate, returning the parsed value.
    #[instrument(skip_all)]
    pub fn load_value<E>(&self, schema: &SchemaNode, env: &E) -> ConfigResult<Value>
    where
        E: EnvSource + ?Sized,
    {
        let raw = self.raw_tree(schema, env).into_value();
        self.validate_value(schema, &raw)
    }

    /// Load over a caller-supplied base and validate, returning the parsed value.
    ///
    /// A leaf resolves to its env value, then the base value, then the
    /// schema's default.
    #[instrument(skip_all)]
    pub fn load_value_with_base<E>(
        &self,
        schema: &SchemaNode,
        env: &E,
        base: &Value,
    ) -> ConfigResult<Value>
    where
        E: EnvSource + ?Sized,
    {
        let raw = self.raw_tree_with_base(schema, env, base).into_value();
        self.validate_value(schema, &raw)
    }

    /// Load, validate and deserialize into `T`.
    pub fn load<T, E>(&self, schema: &SchemaNode, env: &E) -> ConfigResult<T>
    where
        T: DeserializeOwned,
        E: EnvSource + ?Sized,
    {
        let value = self.load_value(schema, env)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load over a caller-supplied base, validate and deserialize into `T`.
    pub fn load_with_base<T, E>(
        &self,
        schema: &SchemaNode,
        env: &E,
        base: &Value,
    ) -> ConfigResult<T>
    where
        T: DeserializeOwned,
        E: EnvSource + ?Sized,
    {
        let value = self.load_value_with_base(schema, env, base)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Validate a caller-supplied raw value, returning the parsed value.
    pub fn validate_value(&self, schema: &SchemaNode, raw: &Value) -> ConfigResult<Value> {
        self.validator
            .validate_aggregated(schema, raw, &self.options.header)
            .map_err(|aggregated| {
                warn!(
                    issues = aggregated.len(),
                    "Configuration validation failed"
                );
                ConfigError::Validation(aggregated)
            })
    }

    /// Validate a caller-supplied raw value and deserialize into `T`.
    pub fn validate<T>(&self, schema: &SchemaNode, raw: &Value) -> ConfigResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.validate_value(schema, raw)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read the merged `figment`, validate it against `schema` and
    /// deserialize into `T`.
    ///
    /// Pairs with [`SchemaProvider`](super::SchemaProvider): the provider
    /// contributes env-derived values only, so schema defaults are applied
    /// here, after every layer has been merged.
    pub fn extract<T>(&self, schema: &SchemaNode, figment: &Figment) -> ConfigResult<T>
    where
        T: DeserializeOwned,
    {
        let merged: Value = figment
            .extract()
            .map_err(|err| ConfigError::Sources(Box::new(err)))?;
        self.validate(schema, &merged)
    }

    fn overlay<E>(&self, mut tree: RawConfigTree, schema: &SchemaNode, env: &E) -> RawConfigTree
    where
        E: EnvSource + ?Sized,
    {
        let bindings = self.bindings(schema);
        debug!(count = bindings.len(), "Discovered env bindings");

        for binding in bindings {
            let name = self.lookup_name(&binding.env_var_name);
            let raw = env.var(&name);
            trace!(
                path = %binding.dotted_path(),
                env = %name,
                present = raw.is_some(),
                "Resolved env binding"
            );
            let value = match self.casts.get(&binding.env_var_name) {
                Some(cast) => {
                    let input = raw
                        .map(|raw| Value::String(raw.to_string()))
                        .or_else(|| tree.get(&binding.path).cloned())
                        .or_else(|| binding.default_value.clone());
                    cast(input.as_ref())
                }
                None => coerce_env_value(&binding.leaf_kind, raw, binding.default_value.as_ref()),
            };
            tree.insert(&binding.path, value);
        }
        tree
    }

    fn lookup_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match &self.options.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}{name}")),
            None => Cow::Borrowed(name),
        }
    }
}

/// Load `T` from `env` with default options.
pub fn load_config<T, E>(schema: &SchemaNode, env: &E) -> ConfigResult<T>
where
    T: DeserializeOwned,
    E: EnvSource + ?Sized,
{
    ConfigLoader::new().load(schema, env)
}

/// Load `T` from a snapshot of the process environment with default options.
pub fn load_from_process_env<T>(schema: &SchemaNode) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    ConfigLoader::new().load(schema, &Environment::from_process())
}

/// Load `T` from `env` over a caller-supplied base with default options.
pub fn load_config_with_base<T, E>(
    schema: &SchemaNode,
    env: &E,
    base: &Value,
) -> ConfigResult<T>
where
    T: DeserializeOwned,
    E: EnvSource + ?Sized,
{
    ConfigLoader::new().load_with_base(schema, env, base)
}

/// Validate a caller-supplied raw value and deserialize into `T`, without
/// reading any environment.
pub fn validate_config<T>(schema: &SchemaNode, raw: &Value) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    ConfigLoader::new().validate(schema, raw)
}
