//! The stages of one load: binding discovery, coercion, tree assembly and validation.

pub mod binding_resolver;
pub mod coercion;
pub mod schema_walker;
pub mod tree_builder;
pub mod validator;

pub use binding_resolver::{BindingResolver, ResolvedBinding};
pub use coercion::coerce_env_value;
pub use schema_walker::SchemaWalker;
pub use tree_builder::RawConfigTree;
pub use validator::SchemaValidator;
