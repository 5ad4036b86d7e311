//! Schema translation engine
//!
//! Turns an annotated validation schema into a model schema: unwraps wrapper
//! combinators into a flat feature set, maps core nodes to field-type
//! tokens, merges option bags by precedence, recurses into nested objects,
//! and attaches a validation bridge to every field.
//!
//! # Design Principles
//!
//! - Single forward pass, first error wins, no partial output
//! - Precedence is explicit: annotation keys over node keys over inferred
//! - Every field re-validates through its original schema on write

mod assemble;
mod bridge;
mod map_type;
mod unwrap;

pub use unwrap::{unwrap_schema, ArrayFeatures, SchemaFeatures, UnwrapOptions};

use crate::error::TranslationResult;
use crate::model::ModelSchema;
use crate::schema::Schema;

/// How generated schemas treat unknown keys when the object schema itself
/// declares nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeysHandling {
    /// Unknown keys are a validation error everywhere
    #[default]
    Throw,
    /// Unknown keys are dropped everywhere, even under explicit strict or
    /// passthrough declarations
    Strip,
    /// Unknown keys are dropped unless the object declares otherwise
    StripUnlessOverridden,
    /// Like `StripUnlessOverridden`, but an undeclared root still throws
    StripUnlessOverriddenOrRoot,
}

/// Which lean-query plugins to leave out of the generated schema
#[derive(Debug, Clone, Copy, Default)]
pub struct DisablePlugins {
    pub lean_virtuals: bool,
    pub lean_defaults: bool,
    pub lean_getters: bool,
}

impl DisablePlugins {
    /// Disable all three plugins
    pub fn all() -> Self {
        Self {
            lean_virtuals: true,
            lean_defaults: true,
            lean_getters: true,
        }
    }
}

/// Options of one translation call
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub disable_plugins: DisablePlugins,
    pub unknown_keys: UnknownKeysHandling,
}

/// Translate an annotated root schema into a model schema using the
/// process-wide default options (see [`crate::setup`]).
pub fn to_model_schema(root: &Schema) -> TranslationResult<ModelSchema> {
    to_model_schema_with(root, &crate::setup::default_translate_options())
}

/// Translate an annotated root schema with explicit options.
pub fn to_model_schema_with(
    root: &Schema,
    options: &TranslateOptions,
) -> TranslationResult<ModelSchema> {
    assemble::assemble_root(root, options)
}
