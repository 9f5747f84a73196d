//! Discovery of env-bound leaves.

use crate::domain::models::{EnvBinding, SchemaNode};
use crate::services::binding_resolver::BindingResolver;

/// Service that discovers which schema leaves bind to which environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaWalker {
    resolver: BindingResolver,
}

impl SchemaWalker {
    /// Create a walker.
    pub const fn new() -> Self {
        Self {
            resolver: BindingResolver::new(),
        }
    }

    /// Every bound leaf under `schema`, paired with its path, in field order.
    ///
    /// Wrappers around objects are looked through without adding a path
    /// segment. Unbound leaves are skipped.
    pub fn bound_leaves<'a>(&self, schema: &'a SchemaNode) -> Vec<(Vec<String>, &'a SchemaNode)> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        self.visit(schema, &mut path, &mut found);
        found
    }

    /// Every env binding under `schema`, in field order.
    pub fn bindings(&self, schema: &SchemaNode) -> Vec<EnvBinding> {
        self.bound_leaves(schema)
            .into_iter()
            .filter_map(|(path, node)| {
                self.resolver.resolve(node).map(|resolved| EnvBinding {
                    path,
                    env_var_name: resolved.env_var_name,
                    leaf_kind: resolved.leaf_kind,
                    default_value: resolved.default_value,
                })
            })
            .collect()
    }

    fn visit<'a>(
        &self,
        node: &'a SchemaNode,
        path: &mut Vec<String>,
        found: &mut Vec<(Vec<String>, &'a SchemaNode)>,
    ) {
        match unwrap_to_object(node) {
            Some(SchemaNode::Object(object)) => {
                for (name, child) in &object.fields {
                    path.push(name.clone());
                    self.visit(child, path, found);
                    path.pop();
                }
            }
            _ => {
                if self.resolver.env_var_name(node).is_some() {
                    found.push((path.clone(), node));
                }
            }
        }
    }
}

/// The object beneath `node`'s wrappers, if there is one.
fn unwrap_to_object(node: &SchemaNode) -> Option<&SchemaNode> {
    let mut current = node;
    while let Some(inner) = current.inner() {
        current = inner;
    }
    matches!(current, SchemaNode::Object(_)).then_some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{array, boolean, number, object, string, IntoSchema, LeafKind};
    use serde_json::json;

    fn paths(bindings: &[EnvBinding]) -> Vec<String> {
        bindings.iter().map(EnvBinding::dotted_path).collect()
    }

    #[test]
    fn test_bindings_follow_field_order() {
        let schema = object()
            .field("port", number().env("PORT"))
            .field(
                "database",
                object()
                    .field("host", string().env("DB_HOST"))
                    .field("port", number().env("DB_PORT")),
            )
            .field("debug", boolean().env("DEBUG"))
            .into_schema();

        let bindings = SchemaWalker::new().bindings(&schema);
        assert_eq!(
            paths(&bindings),
            vec!["port", "database.host", "database.port", "debug"]
        );
        assert_eq!(bindings[1].env_var_name, "DB_HOST");
        assert_eq!(bindings[2].leaf_kind, LeafKind::Number);
    }

    #[test]
    fn test_unbound_leaves_are_skipped() {
        let schema = object()
            .field("name", string())
            .field("port", number().env("PORT").with_default(3000))
            .field("tags", array(string()).optional())
            .into_schema();

        let bindings = SchemaWalker::new().bindings(&schema);
        assert_eq!(paths(&bindings), vec!["port"]);
        assert_eq!(bindings[0].default_value, Some(json!(3000)));
    }

    #[test]
    fn test_wrapped_objects_are_descended() {
        let schema = object()
            .field(
                "database",
                object()
                    .field("host", string().env("DB_HOST").with_default("localhost"))
                    .with_default(json!({})),
            )
            .field(
                "cache",
                object().field("ttl", number().env("CACHE_TTL")).optional(),
            )
            .into_schema();

        let bindings = SchemaWalker::new().bindings(&schema);
        assert_eq!(paths(&bindings), vec!["database.host", "cache.ttl"]);
    }

    #[test]
    fn test_root_leaf_has_empty_path() {
        let schema = string().env("ONLY").into_schema();
        let leaves = SchemaWalker::new().bound_leaves(&schema);
        assert_eq!(leaves.len(), 1);
        assert!(leaves[0].0.is_empty());
    }

    #[test]
    fn test_walk_is_pure() {
        let schema = object()
            .field("a", string().env("A"))
            .field("b", object().field("c", number().env("C")))
            .into_schema();
        let walker = SchemaWalker::new();
        assert_eq!(walker.bindings(&schema), walker.bindings(&schema));
    }
}
