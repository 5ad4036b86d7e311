//! Model layer: the construction target of the translation engine
//!
//! A generated [`ModelSchema`] carries ordered field entries (type token,
//! merged options, validators), schema-level options, and the lean plugin
//! set. Documents are `serde_json::Value` objects validated by
//! [`ModelSchema::validate_document`].

mod options;
mod plugins;
mod types;
mod validate;
pub mod values;

pub use options::{
    DefaultSpec, DefaultValue, FieldOptions, Getter, ParseFn, RequiredFn, RequiredKind,
    RequiredSpec, SchemaOptions, StrictMode, Timestamps, ValidateFn, Validator, ValidatorKind,
    VersionKey,
};
pub use plugins::{LeanOptions, PluginSet, ResolvedLean};
pub use types::{FieldEntry, FieldType, ModelSchema};
pub use validate::{ValidationMode, ValidationReport};
