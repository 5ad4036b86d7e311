//! Validation schema layer
//!
//! The combinator AST consumed by the translation engine, its runtime
//! parser, and opaque-class schemas.
//!
//! # Design Principles
//!
//! - Closed variant set with compiler-checked dispatch
//! - Wrapper combinators own exactly one inner node (no cycles)
//! - Model-layer metadata is explicit node state, never hidden keys
//! - Parsing is deterministic and never mutates values

pub mod build;
mod custom;
mod node;
mod parse;

pub use build::annotate_as_root;
pub use custom::{
    instance_of, is_external_class_registered, register_external_class, InstanceCheck,
};
pub use node::{
    Effect, EnumValue, Literal, ModelMetadata, ObjectSchema, OpaqueClass, Refinement, Schema,
    SchemaKind, UnknownKeys,
};
pub use parse::{ParseError, ParseIssue};
