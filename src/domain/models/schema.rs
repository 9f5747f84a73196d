//! Declarative configuration schema.
//!
//! A schema is a tree of [`SchemaNode`]s. Object nodes nest named fields,
//! leaf nodes describe a primitive value and may carry the name of the
//! environment variable they are bound to, and wrapper nodes modify the
//! node they own (optionality, nullability, defaults and effects) without
//! contributing a path segment.
//!
//! # Example
//!
//! ```
//! use envschema::prelude::*;
//!
//! let schema = object()
//!     .field("port", number().int().env("PORT").with_default(3000))
//!     .field(
//!         "database",
//!         object()
//!             .field("host", string().env("DB_HOST").with_default("localhost"))
//!             .field("url", string().url().env("DATABASE_URL").optional()),
//!     )
//!     .into_schema();
//! # let _ = schema;
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Message reported by a refinement declared without one.
pub const DEFAULT_REFINE_MESSAGE: &str = "Invalid input";

/// Hook run on the raw input before the inner node validates it.
pub type PreprocessFn = Arc<dyn Fn(Option<&Value>) -> Option<Value> + Send + Sync>;

/// Predicate run on a value the inner node already accepted.
pub type RefineFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping applied to a value the inner node already accepted.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A node in a configuration schema.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Nested mapping of named fields, in declaration order.
    Object(ObjectSchema),
    /// String leaf.
    String(StringSchema),
    /// Numeric leaf.
    Number(NumberSchema),
    /// Boolean leaf.
    Boolean(BooleanSchema),
    /// Sequence leaf.
    Array(ArraySchema),
    /// Leaf restricted to a fixed set of string literals.
    Enum(EnumSchema),
    /// Accepts an absent value.
    Optional(Box<SchemaNode>),
    /// Accepts an explicit `null`.
    Nullable(Box<SchemaNode>),
    /// Substitutes the given value when the input is absent.
    Default(Box<SchemaNode>, Value),
    /// Runs an [`Effect`] around the inner node.
    Effect(Box<SchemaNode>, Effect),
}

impl SchemaNode {
    /// Bind the innermost leaf of this node to an environment variable.
    ///
    /// Wrappers are looked through, so `string().optional().env("X")` binds
    /// the same leaf as `string().env("X").optional()`. Objects cannot be
    /// bound and are returned unchanged.
    #[must_use]
    pub fn env(self, name: impl Into<String>) -> Self {
        self.bind_innermost(name.into())
    }

    fn bind_innermost(self, name: String) -> Self {
        match self {
            Self::Object(object) => {
                tracing::warn!(env = %name, "Ignoring env binding on an object schema");
                Self::Object(object)
            }
            Self::String(leaf) => Self::String(leaf.env(name)),
            Self::Number(leaf) => Self::Number(leaf.env(name)),
            Self::Boolean(leaf) => Self::Boolean(leaf.env(name)),
            Self::Array(leaf) => Self::Array(leaf.env(name)),
            Self::Enum(leaf) => Self::Enum(leaf.env(name)),
            Self::Optional(inner) => Self::Optional(Box::new(inner.bind_innermost(name))),
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.bind_innermost(name))),
            Self::Default(inner, value) => {
                Self::Default(Box::new(inner.bind_innermost(name)), value)
            }
            Self::Effect(inner, effect) => {
                Self::Effect(Box::new(inner.bind_innermost(name)), effect)
            }
        }
    }

    /// Environment variable name carried directly by this node, if it is a leaf.
    pub fn bound_env(&self) -> Option<&str> {
        match self {
            Self::String(leaf) => leaf.env.as_deref(),
            Self::Number(leaf) => leaf.env.as_deref(),
            Self::Boolean(leaf) => leaf.env.as_deref(),
            Self::Array(leaf) => leaf.env.as_deref(),
            Self::Enum(leaf) => leaf.env.as_deref(),
            Self::Object(_)
            | Self::Optional(_)
            | Self::Nullable(_)
            | Self::Default(..)
            | Self::Effect(..) => None,
        }
    }

    /// The node owned by a wrapper variant, or `None` for objects and leaves.
    pub fn inner(&self) -> Option<&Self> {
        match self {
            Self::Optional(inner)
            | Self::Nullable(inner)
            | Self::Default(inner, _)
            | Self::Effect(inner, _) => Some(&**inner),
            _ => None,
        }
    }
}

/// Conversion into a [`SchemaNode`], plus the wrapper combinators.
pub trait IntoSchema: Sized {
    /// Convert into a schema node.
    fn into_schema(self) -> SchemaNode;

    /// Allow the value to be absent.
    fn optional(self) -> SchemaNode {
        SchemaNode::Optional(Box::new(self.into_schema()))
    }

    /// Allow the value to be `null`.
    fn nullable(self) -> SchemaNode {
        SchemaNode::Nullable(Box::new(self.into_schema()))
    }

    /// Use `value` when the input is absent.
    fn with_default(self, value: impl Into<Value>) -> SchemaNode {
        SchemaNode::Default(Box::new(self.into_schema()), value.into())
    }

    /// Reject accepted values for which `check` returns false.
    fn refine<F>(self, check: F, message: impl Into<String>) -> SchemaNode
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        SchemaNode::Effect(
            Box::new(self.into_schema()),
            Effect::Refine {
                check: Arc::new(check),
                message: message.into(),
            },
        )
    }

    /// Like [`refine`](Self::refine), reporting [`DEFAULT_REFINE_MESSAGE`].
    fn ensure<F>(self, check: F) -> SchemaNode
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refine(check, DEFAULT_REFINE_MESSAGE)
    }

    /// Rewrite the input before validation.
    fn preprocess<F>(self, f: F) -> SchemaNode
    where
        F: Fn(Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        SchemaNode::Effect(Box::new(self.into_schema()), Effect::Preprocess(Arc::new(f)))
    }

    /// Rewrite the output after successful validation.
    fn transform<F>(self, f: F) -> SchemaNode
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        SchemaNode::Effect(Box::new(self.into_schema()), Effect::Transform(Arc::new(f)))
    }
}

impl IntoSchema for SchemaNode {
    fn into_schema(self) -> SchemaNode {
        self
    }
}

/// Custom behavior attached through [`SchemaNode::Effect`].
#[derive(Clone)]
pub enum Effect {
    /// Rewrites the input before the inner node sees it.
    Preprocess(PreprocessFn),
    /// Adds a custom issue when the predicate fails.
    Refine {
        /// Predicate over the validated value.
        check: RefineFn,
        /// Message reported when the predicate fails.
        message: String,
    },
    /// Maps the validated value.
    Transform(TransformFn),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preprocess(_) => f.write_str("Preprocess(..)"),
            Self::Refine { message, .. } => f
                .debug_struct("Refine")
                .field("message", message)
                .finish_non_exhaustive(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// Object schema: ordered named fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    /// Fields in declaration order. Order drives issue ordering.
    pub fields: Vec<(String, SchemaNode)>,
}

impl ObjectSchema {
    /// Add a field. A field declared twice replaces the earlier definition in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, node: impl IntoSchema) -> Self {
        let name = name.into();
        let node = node.into_schema();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = node,
            None => self.fields.push((name, node)),
        }
        self
    }
}

impl IntoSchema for ObjectSchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::Object(self)
    }
}

/// Format constraints a string leaf can enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Absolute URL with a scheme.
    Url,
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => f.write_str("url"),
        }
    }
}

/// String leaf.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    /// Bound environment variable.
    pub env: Option<String>,
    /// Minimum length in characters.
    pub min_len: Option<usize>,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Required format.
    pub format: Option<StringFormat>,
}

impl StringSchema {
    /// Bind to an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Require at least `len` characters.
    #[must_use]
    pub const fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Allow at most `len` characters.
    #[must_use]
    pub const fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Require a non-empty string.
    #[must_use]
    pub const fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Require a URL.
    #[must_use]
    pub const fn url(mut self) -> Self {
        self.format = Some(StringFormat::Url);
        self
    }
}

impl IntoSchema for StringSchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::String(self)
    }
}

/// Lower bound on a number leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// The bound value.
    pub value: f64,
    /// Whether the bound itself is allowed.
    pub inclusive: bool,
}

/// Number leaf.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    /// Bound environment variable.
    pub env: Option<String>,
    /// Reject non-integral values.
    pub integer: bool,
    /// Lower bound.
    pub min: Option<Bound>,
    /// Upper bound.
    pub max: Option<Bound>,
}

impl NumberSchema {
    /// Bind to an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Reject values with a fractional part.
    #[must_use]
    pub const fn int(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Require a value strictly greater than zero.
    #[must_use]
    pub const fn positive(mut self) -> Self {
        self.min = Some(Bound {
            value: 0.0,
            inclusive: false,
        });
        self
    }

    /// Require a value greater than or equal to `value`.
    #[must_use]
    pub const fn min(mut self, value: f64) -> Self {
        self.min = Some(Bound {
            value,
            inclusive: true,
        });
        self
    }

    /// Require a value less than or equal to `value`.
    #[must_use]
    pub const fn max(mut self, value: f64) -> Self {
        self.max = Some(Bound {
            value,
            inclusive: true,
        });
        self
    }
}

impl IntoSchema for NumberSchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::Number(self)
    }
}

/// Boolean leaf.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    /// Bound environment variable.
    pub env: Option<String>,
}

impl BooleanSchema {
    /// Bind to an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }
}

impl IntoSchema for BooleanSchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::Boolean(self)
    }
}

/// Array leaf.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    /// Bound environment variable.
    pub env: Option<String>,
    /// Schema every element must satisfy.
    pub item: Box<SchemaNode>,
    /// Minimum element count.
    pub min_items: Option<usize>,
    /// Maximum element count.
    pub max_items: Option<usize>,
}

impl ArraySchema {
    /// Bind to an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Require at least `count` elements.
    #[must_use]
    pub const fn min_items(mut self, count: usize) -> Self {
        self.min_items = Some(count);
        self
    }

    /// Allow at most `count` elements.
    #[must_use]
    pub const fn max_items(mut self, count: usize) -> Self {
        self.max_items = Some(count);
        self
    }
}

impl IntoSchema for ArraySchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::Array(self)
    }
}

/// Enum leaf.
#[derive(Debug, Clone, Default)]
pub struct EnumSchema {
    /// Bound environment variable.
    pub env: Option<String>,
    /// Allowed literals, in declaration order.
    pub options: Vec<String>,
}

impl EnumSchema {
    /// Bind to an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Whether `value` is one of the allowed literals.
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}

impl IntoSchema for EnumSchema {
    fn into_schema(self) -> SchemaNode {
        SchemaNode::Enum(self)
    }
}

/// Start an object schema.
pub fn object() -> ObjectSchema {
    ObjectSchema::default()
}

/// Start a string leaf.
pub fn string() -> StringSchema {
    StringSchema::default()
}

/// Start a number leaf.
pub fn number() -> NumberSchema {
    NumberSchema::default()
}

/// Start a boolean leaf.
pub fn boolean() -> BooleanSchema {
    BooleanSchema::default()
}

/// Start an array leaf whose elements satisfy `item`.
pub fn array(item: impl IntoSchema) -> ArraySchema {
    ArraySchema {
        env: None,
        item: Box::new(item.into_schema()),
        min_items: None,
        max_items: None,
    }
}

/// Start an enum leaf over the given literals.
pub fn enumeration<I, S>(options: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema {
        env: None,
        options: options.into_iter().map(Into::into).collect(),
    }
}
