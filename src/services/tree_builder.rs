//! Assembly of coerced values into a nested tree.

use serde_json::{Map, Value};

/// Nested raw configuration assembled from coerced env values.
///
/// Mirrors the schema's object nesting. Leaves with no discovered binding,
/// or whose env value was absent, have no key at all unless the tree was
/// seeded from a caller-supplied base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfigTree {
    root: Map<String, Value>,
}

impl RawConfigTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree seeded with a caller-supplied base mapping.
    ///
    /// A base that is not a JSON object contributes nothing.
    pub fn from_base(base: &Value) -> Self {
        match base {
            Value::Object(root) => Self { root: root.clone() },
            Value::Null => Self::new(),
            other => {
                tracing::warn!(
                    found = crate::services::validator::type_name(Some(other)),
                    "Ignoring non-object base configuration"
                );
                Self::new()
            }
        }
    }

    /// The value at `path`, if every segment exists.
    pub fn get(&self, path: &[String]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.root.get(first)?, |value, segment| value.get(segment))
    }

    /// Assign `value` at `path`, creating intermediate objects on the way.
    ///
    /// Intermediate objects are created even when `value` is `None`, and an
    /// object already present at a prefix is reused, never replaced. A `None`
    /// value leaves any existing leaf untouched. Empty paths are ignored.
    pub fn insert(&mut self, path: &[String], value: Option<Value>) {
        let Some((leaf, parents)) = path.split_last() else {
            tracing::warn!("Ignoring env binding on the schema root");
            return;
        };

        let mut current = &mut self.root;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                tracing::warn!(
                    segment = %segment,
                    "Replacing non-object value at an intermediate path segment"
                );
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(next) => current = next,
                _ => return,
            }
        }

        if let Some(value) = value {
            current.insert(leaf.clone(), value);
        }
    }

    /// Borrow the root mapping.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Convert into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl FromIterator<(Vec<String>, Option<Value>)> for RawConfigTree {
    fn from_iter<I: IntoIterator<Item = (Vec<String>, Option<Value>)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (path, value) in iter {
            tree.insert(&path, value);
        }
        tree
    }
}
