//! Structural validation of a raw configuration tree against a schema.
//!
//! Validation walks the whole tree and collects every issue instead of
//! stopping at the first one. Issues are reported in the order they are
//! met: object fields in declaration order, array elements by index.

use crate::domain::models::issue::quote_options;
use crate::domain::models::{
    AggregatedError, Effect, Issue, IssueKind, Measure, PathSegment, SchemaNode, StringFormat,
};
use serde_json::{Map, Value};

/// Service that validates values against a schema and produces the parsed output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Create a validator.
    pub const fn new() -> Self {
        Self
    }

    /// Validate `input` against `schema`.
    ///
    /// On success returns the parsed value with defaults applied, unknown
    /// object keys stripped and effects run. On failure returns every issue.
    pub fn validate(&self, schema: &SchemaNode, input: &Value) -> Result<Value, Vec<Issue>> {
        let mut walk = Walk::default();
        let output = walk.visit(schema, Some(input));
        if walk.issues.is_empty() {
            Ok(output.unwrap_or(Value::Null))
        } else {
            Err(walk.issues)
        }
    }

    /// Validate and aggregate failures under `header`.
    pub fn validate_aggregated(
        &self,
        schema: &SchemaNode,
        input: &Value,
        header: &str,
    ) -> Result<Value, AggregatedError> {
        self.validate(schema, input)
            .map_err(|issues| AggregatedError::with_header(header, &issues))
    }
}

#[derive(Default)]
struct Walk {
    path: Vec<PathSegment>,
    issues: Vec<Issue>,
}

impl Walk {
    fn report(&mut self, kind: IssueKind) {
        self.issues.push(Issue {
            path: self.path.clone(),
            kind,
        });
    }

    fn invalid_type(&mut self, expected: impl Into<String>, input: Option<&Value>) {
        self.report(IssueKind::InvalidType {
            expected: expected.into(),
            received: type_name(input).to_string(),
        });
    }

    /// Returns the parsed value, or `None` when the output is absent or invalid.
    fn visit(&mut self, node: &SchemaNode, input: Option<&Value>) -> Option<Value> {
        match node {
            SchemaNode::Object(object) => {
                let Some(Value::Object(map)) = input else {
                    self.invalid_type("object", input);
                    return None;
                };
                let mut output = Map::new();
                for (name, child) in &object.fields {
                    self.path.push(PathSegment::Key(name.clone()));
                    if let Some(value) = self.visit(child, map.get(name)) {
                        output.insert(name.clone(), value);
                    }
                    self.path.pop();
                }
                Some(Value::Object(output))
            }
            SchemaNode::String(leaf) => {
                let Some(Value::String(text)) = input else {
                    self.invalid_type("string", input);
                    return None;
                };
                let len = text.chars().count();
                if let Some(min) = leaf.min_len.filter(|min| len < *min) {
                    self.report(IssueKind::TooSmall {
                        subject: Measure::StringLength,
                        minimum: to_f64(min),
                        inclusive: true,
                    });
                }
                if let Some(max) = leaf.max_len.filter(|max| len > *max) {
                    self.report(IssueKind::TooBig {
                        subject: Measure::StringLength,
                        maximum: to_f64(max),
                        inclusive: true,
                    });
                }
                if leaf.format == Some(StringFormat::Url) && !is_valid_url(text) {
                    self.report(IssueKind::InvalidString {
                        format: StringFormat::Url,
                    });
                }
                Some(Value::String(text.clone()))
            }
            SchemaNode::Number(leaf) => {
                let Some(Value::Number(number)) = input else {
                    self.invalid_type("number", input);
                    return None;
                };
                let Some(value) = number.as_f64() else {
                    self.invalid_type("number", input);
                    return None;
                };
                if leaf.integer && value.fract() != 0.0 {
                    self.report(IssueKind::InvalidType {
                        expected: "integer".to_string(),
                        received: "float".to_string(),
                    });
                }
                if let Some(min) = leaf.min {
                    let below = if min.inclusive {
                        value < min.value
                    } else {
                        value <= min.value
                    };
                    if below {
                        self.report(IssueKind::TooSmall {
                            subject: Measure::Number,
                            minimum: min.value,
                            inclusive: min.inclusive,
                        });
                    }
                }
                if let Some(max) = leaf.max {
                    let above = if max.inclusive {
                        value > max.value
                    } else {
                        value >= max.value
                    };
                    if above {
                        self.report(IssueKind::TooBig {
                            subject: Measure::Number,
                            maximum: max.value,
                            inclusive: max.inclusive,
                        });
                    }
                }
                Some(Value::Number(number.clone()))
            }
            SchemaNode::Boolean(_) => {
                let Some(Value::Bool(flag)) = input else {
                    self.invalid_type("boolean", input);
                    return None;
                };
                Some(Value::Bool(*flag))
            }
            SchemaNode::Array(leaf) => {
                let Some(Value::Array(items)) = input else {
                    self.invalid_type("array", input);
                    return None;
                };
                if let Some(min) = leaf.min_items.filter(|min| items.len() < *min) {
                    self.report(IssueKind::TooSmall {
                        subject: Measure::ArrayLength,
                        minimum: to_f64(min),
                        inclusive: true,
                    });
                }
                if let Some(max) = leaf.max_items.filter(|max| items.len() > *max) {
                    self.report(IssueKind::TooBig {
                        subject: Measure::ArrayLength,
                        maximum: to_f64(max),
                        inclusive: true,
                    });
                }
                let mut output = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(index));
                    output.push(self.visit(&leaf.item, Some(item)).unwrap_or(Value::Null));
                    self.path.pop();
                }
                Some(Value::Array(output))
            }
            SchemaNode::Enum(leaf) => {
                let Some(Value::String(text)) = input else {
                    self.invalid_type(quote_options(&leaf.options), input);
                    return None;
                };
                if !leaf.allows(text) {
                    self.report(IssueKind::InvalidEnumValue {
                        options: leaf.options.clone(),
                        received: text.clone(),
                    });
                }
                Some(Value::String(text.clone()))
            }
            SchemaNode::Optional(inner) => input.and_then(|value| self.visit(inner, Some(value))),
            SchemaNode::Nullable(inner) => match input {
                Some(Value::Null) => Some(Value::Null),
                _ => self.visit(inner, input),
            },
            SchemaNode::Default(inner, default) => self.visit(inner, input.or(Some(default))),
            SchemaNode::Effect(inner, effect) => self.visit_effect(inner, effect, input),
        }
    }

    fn visit_effect(
        &mut self,
        inner: &SchemaNode,
        effect: &Effect,
        input: Option<&Value>,
    ) -> Option<Value> {
        match effect {
            Effect::Preprocess(preprocess) => {
                let prepared = preprocess(input);
                self.visit(inner, prepared.as_ref())
            }
            Effect::Refine { check, message } => {
                let before = self.issues.len();
                let output = self.visit(inner, input);
                if self.issues.len() == before {
                    if let Some(value) = output.as_ref().filter(|value| !check(*value)) {
                        tracing::trace!(value = %value, "Refinement rejected value");
                        self.report(IssueKind::Custom {
                            message: message.clone(),
                        });
                    }
                }
                output
            }
            Effect::Transform(transform) => {
                let before = self.issues.len();
                let output = self.visit(inner, input);
                if self.issues.len() == before {
                    output.map(&**transform)
                } else {
                    output
                }
            }
        }
    }
}

/// Type name of a value as reported in type-mismatch issues.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(count: usize) -> f64 {
    count as f64
}

/// Absolute URL check: a scheme, a colon and a non-empty remainder. When the
/// remainder starts with `//` the authority must be non-empty.
fn is_valid_url(text: &str) -> bool {
    let Some((scheme, rest)) = text.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || rest.is_empty() || text.chars().any(char::is_whitespace) {
        return false;
    }
    rest.strip_prefix("//").is_none_or(|after| {
        after
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|authority| !authority.is_empty())
    })
}
