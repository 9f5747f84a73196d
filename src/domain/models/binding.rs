//! Env bindings discovered in a schema.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied conversion that replaces the per-kind coercion of one
/// bound variable.
///
/// Receives the first present of: the env value (as a JSON string), the
/// caller's base value at the leaf's path, the declared default. Returning
/// `None` leaves the leaf absent.
pub type CastFn = Arc<dyn Fn(Option<&Value>) -> Option<Value> + Send + Sync>;

/// Primitive kind of a bound leaf, as far as coercion is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    /// Raw string passes through unchanged.
    String,
    /// Parsed as a numeric literal.
    Number,
    /// `"true"` is true, anything else is false.
    Boolean,
    /// Split on `,`.
    Array,
    /// Kept only when it is one of `options`.
    Enum {
        /// Allowed literals.
        options: Vec<String>,
    },
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Array => f.write_str("array"),
            Self::Enum { .. } => f.write_str("enum"),
        }
    }
}

/// Association between a schema path and an environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvBinding {
    /// Field names from the schema root down to the leaf.
    pub path: Vec<String>,
    /// Name of the bound environment variable.
    pub env_var_name: String,
    /// Coercion kind of the leaf.
    pub leaf_kind: LeafKind,
    /// Default declared by the outermost default wrapper around the leaf.
    pub default_value: Option<Value>,
}

impl EnvBinding {
    /// The path joined with `.`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}
