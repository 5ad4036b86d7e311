//! Model schema type definitions
//!
//! The construction target of the translation engine: a tree of model
//! schemas describing field names, field-type tokens, and per-field /
//! per-schema options, in the shape the document-model layer consumes.
//!
//! Supported field-type tokens:
//! - string / number / boolean / date: non-coercing scalar types
//! - mixed: opaque passthrough accepting any shape
//! - map: free-form key/value container
//! - buffer / objectid / decimal128 / uuid / external: opaque classes
//! - subdocument: a nested model schema
//! - array: homogeneous array of another token

use std::collections::BTreeMap;

use super::options::{FieldOptions, SchemaOptions, Validator};
use super::plugins::PluginSet;

/// Field-type tokens understood by the model layer
#[derive(Debug, Clone)]
pub enum FieldType {
    /// UTF-8 string, no coercion
    String,
    /// Double-precision number, no coercion
    Number,
    /// Boolean, no coercion
    Boolean,
    /// Date, stored as an RFC 3339 string
    Date,
    /// Generic passthrough accepting any shape
    Mixed,
    /// Free-form key/value container
    Map,
    /// Raw byte buffer
    Buffer,
    /// Document object identifier
    ObjectId,
    /// 128-bit decimal
    Decimal128,
    /// UUID
    Uuid,
    /// A caller-registered opaque class, by registry name
    External(String),
    /// Nested model schema (boxed to allow recursive types)
    Subdocument(Box<ModelSchema>),
    /// Homogeneous array with a single element type
    Array(Box<FieldType>),
}

impl FieldType {
    /// Returns the token name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Mixed => "mixed",
            FieldType::Map => "map",
            FieldType::Buffer => "buffer",
            FieldType::ObjectId => "objectid",
            FieldType::Decimal128 => "decimal128",
            FieldType::Uuid => "uuid",
            FieldType::External(_) => "external",
            FieldType::Subdocument(_) => "subdocument",
            FieldType::Array(_) => "array",
        }
    }

    /// Wrap this token in `depth` array levels
    pub fn wrap_in_arrays(self, depth: u32) -> FieldType {
        let mut current = self;
        for _ in 0..depth {
            current = FieldType::Array(Box::new(current));
        }
        current
    }

    /// Returns the number of array levels around the innermost token
    pub fn array_depth(&self) -> u32 {
        match self {
            FieldType::Array(inner) => 1 + inner.array_depth(),
            _ => 0,
        }
    }

    /// Returns the innermost non-array token
    pub fn innermost(&self) -> &FieldType {
        match self {
            FieldType::Array(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Returns the nested model schema, if this token is a subdocument
    pub fn as_subdocument(&self) -> Option<&ModelSchema> {
        match self {
            FieldType::Subdocument(schema) => Some(schema),
            _ => None,
        }
    }
}

/// One field of a generated model schema
#[derive(Debug, Clone)]
pub struct FieldEntry {
    /// Resolved field-type token
    pub field_type: FieldType,
    /// Merged field options
    pub options: FieldOptions,
    /// Validators run by the model layer's write path, in registration
    /// order. The validation bridge is registered here alongside any
    /// author-supplied validator.
    pub validators: Vec<Validator>,
}

impl FieldEntry {
    pub fn new(field_type: FieldType, options: FieldOptions) -> Self {
        Self {
            field_type,
            options,
            validators: Vec::new(),
        }
    }

    /// Register a validator for this field
    pub fn add_validator(&mut self, validator: Validator) {
        self.validators.push(validator);
    }
}

/// A generated model schema: ordered fields plus schema-level options.
///
/// Ownership is a strict tree: subdocument fields exclusively own their
/// child schemas.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    fields: BTreeMap<String, FieldEntry>,
    options: SchemaOptions,
    plugins: PluginSet,
}

impl ModelSchema {
    /// Create an empty schema with the given options
    pub fn new(options: SchemaOptions) -> Self {
        Self {
            fields: BTreeMap::new(),
            options,
            plugins: PluginSet::default(),
        }
    }

    /// Create an empty schema with options and an explicit plugin set
    pub fn with_plugins(options: SchemaOptions, plugins: PluginSet) -> Self {
        Self {
            fields: BTreeMap::new(),
            options,
            plugins,
        }
    }

    /// Register a field. A repeated name replaces the earlier entry.
    pub fn add_field(&mut self, name: impl Into<String>, entry: FieldEntry) {
        self.fields.insert(name.into(), entry);
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }

    /// Mutable field lookup
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldEntry> {
        self.fields.get_mut(name)
    }

    /// Look up a field by dotted path, descending through subdocuments
    /// and array levels.
    pub fn field_at_path(&self, path: &str) -> Option<&FieldEntry> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut entry = self.fields.get(first)?;
        for segment in segments {
            entry = entry.field_type.innermost().as_subdocument()?.field(segment)?;
        }
        Some(entry)
    }

    /// Iterate fields in deterministic (name) order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldEntry)> {
        self.fields.iter()
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema-level options
    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// The plugin set wired into this schema
    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }
}
