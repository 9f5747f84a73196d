//! Schema, binding and issue types.

pub mod binding;
pub mod issue;
pub mod schema;

pub use binding::{CastFn, EnvBinding, LeafKind};
pub use issue::{AggregatedError, Issue, IssueKind, Measure, PathSegment, ValidationIssue};
pub use schema::{
    array, boolean, enumeration, number, object, string, ArraySchema, BooleanSchema, Bound,
    Effect, EnumSchema, IntoSchema, NumberSchema, ObjectSchema, SchemaNode, StringFormat,
    StringSchema, DEFAULT_REFINE_MESSAGE,
};
