//! Env binding resolution through wrapper layers.

use crate::domain::models::{LeafKind, SchemaNode};
use serde_json::Value;

/// What a single schema node is bound to, once its wrappers are peeled off.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBinding {
    /// Bound environment variable.
    pub env_var_name: String,
    /// Coercion kind of the innermost leaf.
    pub leaf_kind: LeafKind,
    /// Default declared by the outermost default wrapper.
    pub default_value: Option<Value>,
}

/// Service that finds the env binding of a schema node.
///
/// Optional, nullable, default and effect wrappers are unwrapped in whatever
/// order they are nested until a leaf is reached. Objects and unbound leaves
/// resolve to `None`, which is not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingResolver;

impl BindingResolver {
    /// Create a resolver.
    pub const fn new() -> Self {
        Self
    }

    /// Resolve the binding carried by `node`, looking through wrappers.
    pub fn resolve(&self, node: &SchemaNode) -> Option<ResolvedBinding> {
        let mut current = node;
        let mut default_value: Option<&Value> = None;

        loop {
            match current {
                SchemaNode::Optional(inner)
                | SchemaNode::Nullable(inner)
                | SchemaNode::Effect(inner, _) => current = &**inner,
                SchemaNode::Default(inner, value) => {
                    default_value.get_or_insert(value);
                    current = &**inner;
                }
                SchemaNode::Object(_) => return None,
                leaf => {
                    let env_var_name = leaf.bound_env()?.to_string();
                    return Some(ResolvedBinding {
                        env_var_name,
                        leaf_kind: leaf_kind(leaf)?,
                        default_value: default_value.cloned(),
                    });
                }
            }
        }
    }

    /// Bound name of `node`, if any.
    pub fn env_var_name<'a>(&self, node: &'a SchemaNode) -> Option<&'a str> {
        let mut current = node;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current.bound_env()
    }
}

/// Coercion kind of a leaf node. `None` for objects and wrappers.
pub fn leaf_kind(node: &SchemaNode) -> Option<LeafKind> {
    match node {
        SchemaNode::String(_) => Some(LeafKind::String),
        SchemaNode::Number(_) => Some(LeafKind::Number),
        SchemaNode::Boolean(_) => Some(LeafKind::Boolean),
        SchemaNode::Array(_) => Some(LeafKind::Array),
        SchemaNode::Enum(leaf) => Some(LeafKind::Enum {
            options: leaf.options.clone(),
        }),
        SchemaNode::Object(_)
        | SchemaNode::Optional(_)
        | SchemaNode::Nullable(_)
        | SchemaNode::Default(..)
        | SchemaNode::Effect(..) => None,
    }
}
