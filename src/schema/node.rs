//! Validation schema nodes
//!
//! The composable, combinator-based type description consumed by the
//! translation engine. Every node carries a closed [`SchemaKind`]
//! discriminant; wrapping combinators (optional, default, branded, nullable,
//! effects, array) own exactly one inner node, so a schema is a tree.
//!
//! Model-layer metadata travels as explicit fields on the node rather than
//! through hidden keys: per-field options via [`Schema::field_options`],
//! schema-level options via [`Schema::schema_options`], and the nesting
//! descriptor via the [`SchemaKind::Annotated`] wrapper.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::model::{DefaultValue, FieldOptions, SchemaOptions};

/// A literal value carried by a literal schema
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
    Null,
    Undefined,
    BigInt(i64),
}

/// One value of a native enumeration
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Number(f64),
    String(String),
}

/// Unknown-keys handling declared on an object schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Unknown keys are dropped (the default)
    Strip,
    /// Unknown keys are a parse error
    Strict,
    /// Unknown keys are kept
    Passthrough,
}

/// An object schema: ordered member map plus unknown-keys handling
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub(crate) shape: BTreeMap<String, Schema>,
    pub(crate) unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    /// Iterate members in deterministic (name) order
    pub fn shape(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.shape.iter()
    }

    /// Look up a member by name
    pub fn member(&self, name: &str) -> Option<&Schema> {
        self.shape.get(name)
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }
}

/// A refinement predicate attached through an effects wrapper
#[derive(Clone)]
pub struct Refinement {
    pub(crate) check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    pub(crate) message: Option<String>,
}

impl Refinement {
    pub fn new(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            check: Arc::new(check),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("message", &self.message)
            .finish()
    }
}

/// The effect kind of an effects wrapper. Only refinements survive
/// translation; transforms and preprocessors are rejected by the mapping
/// policy.
#[derive(Debug, Clone)]
pub enum Effect {
    Refinement(Refinement),
    Transform,
    Preprocess,
}

impl Effect {
    /// Effect kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Effect::Refinement(_) => "refinement",
            Effect::Transform => "transform",
            Effect::Preprocess => "preprocess",
        }
    }
}

/// A known opaque class an any-typed schema may be associated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpaqueClass {
    /// Raw byte buffer
    Buffer,
    /// Document object identifier
    ObjectId,
    /// 128-bit decimal
    Decimal128,
    /// UUID
    Uuid,
    /// A caller-registered class, by registry name
    External(String),
}

impl OpaqueClass {
    /// Class name used in messages
    pub fn name(&self) -> &str {
        match self {
            OpaqueClass::Buffer => "Buffer",
            OpaqueClass::ObjectId => "ObjectId",
            OpaqueClass::Decimal128 => "Decimal128",
            OpaqueClass::Uuid => "Uuid",
            OpaqueClass::External(name) => name,
        }
    }
}

/// Model-layer metadata attached by the root annotation: per-field options
/// keyed by member name plus schema-level options.
#[derive(Debug, Clone, Default)]
pub struct ModelMetadata {
    pub type_options: BTreeMap<String, FieldOptions>,
    pub schema_options: Option<SchemaOptions>,
}

impl ModelMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach options for one member field
    pub fn with_field_options(mut self, field: impl Into<String>, options: FieldOptions) -> Self {
        self.type_options.insert(field.into(), options);
        self
    }

    /// Attach schema-level options
    pub fn with_schema_options(mut self, options: SchemaOptions) -> Self {
        self.schema_options = Some(options);
        self
    }
}

/// The closed variant set of validation schema nodes
#[derive(Debug, Clone)]
pub enum SchemaKind {
    // Mappable leaves
    String,
    Number,
    Boolean,
    Date,
    Literal(Literal),
    Enum(Vec<String>),
    NativeEnum(Vec<(String, EnumValue)>),
    Null,
    Nan,
    Object(ObjectSchema),
    Union(Vec<Schema>),
    DiscriminatedUnion {
        tag: String,
        variants: Vec<Schema>,
    },
    Map {
        key: Option<Box<Schema>>,
        value: Option<Box<Schema>>,
    },
    Record {
        value: Box<Schema>,
    },
    Tuple(Vec<Schema>),
    Intersection(Box<Schema>, Box<Schema>),
    Any {
        class: Option<OpaqueClass>,
    },
    Unknown,

    // Wrappers
    Optional(Box<Schema>),
    Nullable(Box<Schema>),
    Default {
        inner: Box<Schema>,
        value: DefaultValue,
    },
    Branded(Box<Schema>),
    Effects {
        inner: Box<Schema>,
        effect: Effect,
    },
    Array(Box<Schema>),
    /// Root annotation wrapper pairing an object schema with model metadata
    Annotated {
        inner: Box<Schema>,
        metadata: ModelMetadata,
    },

    // Unsupported bucket
    Undefined,
    Void,
    BigInt,
    Never,
    Set(Box<Schema>),
    Promise(Box<Schema>),
    Function,
    Lazy,
}

impl SchemaKind {
    /// Variant name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::NativeEnum(_) => "native enum",
            SchemaKind::Null => "null",
            SchemaKind::Nan => "nan",
            SchemaKind::Object(_) => "object",
            SchemaKind::Union(_) => "union",
            SchemaKind::DiscriminatedUnion { .. } => "discriminated union",
            SchemaKind::Map { .. } => "map",
            SchemaKind::Record { .. } => "record",
            SchemaKind::Tuple(_) => "tuple",
            SchemaKind::Intersection(_, _) => "intersection",
            SchemaKind::Any { .. } => "any",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Optional(_) => "optional",
            SchemaKind::Nullable(_) => "nullable",
            SchemaKind::Default { .. } => "default",
            SchemaKind::Branded(_) => "branded",
            SchemaKind::Effects { .. } => "effects",
            SchemaKind::Array(_) => "array",
            SchemaKind::Annotated { .. } => "annotated",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Void => "void",
            SchemaKind::BigInt => "bigint",
            SchemaKind::Never => "never",
            SchemaKind::Set(_) => "set",
            SchemaKind::Promise(_) => "promise",
            SchemaKind::Function => "function",
            SchemaKind::Lazy => "lazy",
        }
    }
}

/// One validation schema node: a kind plus explicit model-layer metadata.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) kind: SchemaKind,
    pub(crate) field_options: Option<FieldOptions>,
    pub(crate) schema_options: Option<SchemaOptions>,
}

impl Schema {
    pub(crate) fn from_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            field_options: None,
            schema_options: None,
        }
    }

    /// The node's variant
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Variant name used in error messages
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Field-level model options attached to this node, if any
    pub fn field_options(&self) -> Option<&FieldOptions> {
        self.field_options.as_ref()
    }

    /// Schema-level model options attached to this node, if any
    pub fn schema_options(&self) -> Option<&SchemaOptions> {
        self.schema_options.as_ref()
    }

    /// Whether an absent value satisfies this schema (optionality and
    /// defaults reach through transparent wrappers).
    pub fn accepts_missing(&self) -> bool {
        match &self.kind {
            SchemaKind::Optional(_) | SchemaKind::Default { .. } => true,
            SchemaKind::Any { .. } | SchemaKind::Unknown => true,
            SchemaKind::Undefined | SchemaKind::Void => true,
            SchemaKind::Branded(inner)
            | SchemaKind::Nullable(inner)
            | SchemaKind::Annotated { inner, .. } => inner.accepts_missing(),
            SchemaKind::Effects { inner, .. } => inner.accepts_missing(),
            _ => false,
        }
    }
}
