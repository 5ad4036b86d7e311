//! Field-level and schema-level option bags for generated model schemas
//!
//! Option merging is shallow: every set entry of the overlaying bag replaces
//! the corresponding entry of the base bag, unset entries leave the base
//! untouched. `extra` passthrough entries merge key by key.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

/// A validation predicate over a field value.
///
/// The first argument is the enclosing document, when one exists. During
/// update-style validation no live document is available and `None` is
/// passed instead.
pub type ValidateFn = Arc<dyn Fn(Option<&Value>, &Value) -> bool + Send + Sync>;

/// A requiredness predicate, evaluated against the enclosing document
/// (`None` during update-style validation).
pub type RequiredFn = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// A full re-parse validator. Returns the parse failure text on rejection.
pub type ParseFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// The executable part of a field validator
#[derive(Clone)]
pub enum ValidatorKind {
    /// Value must be a string matching the pattern
    Pattern(Regex),
    /// Arbitrary predicate
    Predicate(ValidateFn),
    /// Full re-parse through an original validation schema
    Parse(ParseFn),
}

/// A field validator with an optional custom failure message
#[derive(Clone)]
pub struct Validator {
    pub kind: ValidatorKind,
    pub message: Option<String>,
}

impl Validator {
    /// Create a pattern validator
    pub fn pattern(regex: Regex) -> Self {
        Self {
            kind: ValidatorKind::Pattern(regex),
            message: None,
        }
    }

    /// Create a predicate validator
    pub fn predicate(f: impl Fn(Option<&Value>, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            kind: ValidatorKind::Predicate(Arc::new(f)),
            message: None,
        }
    }

    /// Attach a custom failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorKind::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            ValidatorKind::Predicate(_) => write!(f, "Predicate"),
            ValidatorKind::Parse(_) => write!(f, "Parse"),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ValidatorKind::Pattern(re) => format!("Pattern({})", re.as_str()),
            ValidatorKind::Predicate(_) => "Predicate".to_string(),
            ValidatorKind::Parse(_) => "Parse".to_string(),
        };
        f.debug_struct("Validator")
            .field("kind", &kind)
            .field("message", &self.message)
            .finish()
    }
}

/// The requiredness setting of a field
#[derive(Clone)]
pub enum RequiredKind {
    /// Always required / never required
    Flag(bool),
    /// Required when the predicate holds for the current document
    Predicate(RequiredFn),
}

/// A field requiredness spec with an optional custom failure message
#[derive(Clone)]
pub struct RequiredSpec {
    pub required: RequiredKind,
    pub message: Option<String>,
}

impl RequiredSpec {
    /// A plain boolean requiredness
    pub fn flag(required: bool) -> Self {
        Self {
            required: RequiredKind::Flag(required),
            message: None,
        }
    }

    /// A conditional requiredness
    pub fn predicate(f: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static) -> Self {
        Self {
            required: RequiredKind::Predicate(Arc::new(f)),
            message: None,
        }
    }

    /// Attach a custom failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the plain flag value, if this spec is a plain flag
    pub fn as_flag(&self) -> Option<bool> {
        match self.required {
            RequiredKind::Flag(b) => Some(b),
            RequiredKind::Predicate(_) => None,
        }
    }
}

impl fmt::Debug for RequiredSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.required {
            RequiredKind::Flag(b) => write!(f, "RequiredSpec::Flag({})", b),
            RequiredKind::Predicate(_) => write!(f, "RequiredSpec::Predicate"),
        }
    }
}

/// A field default value
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value
    Value(Value),
    /// The current timestamp, produced when the default is applied
    Now,
    /// A caller-supplied producer, invoked when the default is applied
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce the concrete default value
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(v) => v.clone(),
            DefaultValue::Now => Value::String(chrono::Utc::now().to_rfc3339()),
            DefaultValue::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(v) => write!(f, "DefaultValue::Value({})", v),
            DefaultValue::Now => write!(f, "DefaultValue::Now"),
            DefaultValue::Producer(_) => write!(f, "DefaultValue::Producer"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(v: Value) -> Self {
        DefaultValue::Value(v)
    }
}

/// A field default entry.
///
/// `Unset` explicitly clears any inferred default; the translator emits it
/// for array-typed and object-typed fields that carry no declared default so
/// that container defaults are never shared between documents.
#[derive(Debug, Clone)]
pub enum DefaultSpec {
    /// Explicitly no default
    Unset,
    /// A default to apply when the field is absent
    Set(DefaultValue),
}

/// A read-time getter applied to stored field values
#[derive(Clone)]
pub enum Getter {
    /// Unwrap the model layer's internal binary wrapper to its raw form
    UnwrapBinary,
    /// Caller-supplied transformation
    Custom(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Getter::UnwrapBinary => write!(f, "Getter::UnwrapBinary"),
            Getter::Custom(_) => write!(f, "Getter::Custom"),
        }
    }
}

/// Field-level options of a generated model schema entry
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// Whether the field must be present
    pub required: Option<RequiredSpec>,
    /// Default value handling
    pub default: Option<DefaultSpec>,
    /// Build a secondary index over this field
    pub index: Option<bool>,
    /// Enforce uniqueness
    pub unique: Option<bool>,
    /// Reject writes after the initial one
    pub immutable: Option<bool>,
    /// Sparse index
    pub sparse: Option<bool>,
    /// Include in query projections by default
    pub select: Option<bool>,
    /// Alternative name the field is reachable under
    pub alias: Option<String>,
    /// Read-time getter
    pub get: Option<Getter>,
    /// Custom validator
    pub validate: Option<Validator>,
    /// Validator under the translator's namespace; renamed onto `validate`
    /// during assembly. Setting both forms is a translation error.
    pub mz_validate: Option<Validator>,
    /// Requiredness under the translator's namespace; renamed onto
    /// `required` during assembly. Setting both forms is a translation error.
    pub mz_required: Option<RequiredSpec>,
    /// Whether a subdocument field keeps its own identity field
    pub keep_id: Option<bool>,
    /// Whether non-array values may be coerced into single-element arrays
    pub cast_non_arrays: Option<bool>,
    /// Passthrough options handed to the model layer untouched
    pub extra: BTreeMap<String, Value>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `over` on top of `self`: set entries of `over` win.
    pub fn overlay(mut self, over: &FieldOptions) -> Self {
        if over.required.is_some() {
            self.required = over.required.clone();
        }
        if over.default.is_some() {
            self.default = over.default.clone();
        }
        if over.index.is_some() {
            self.index = over.index;
        }
        if over.unique.is_some() {
            self.unique = over.unique;
        }
        if over.immutable.is_some() {
            self.immutable = over.immutable;
        }
        if over.sparse.is_some() {
            self.sparse = over.sparse;
        }
        if over.select.is_some() {
            self.select = over.select;
        }
        if over.alias.is_some() {
            self.alias = over.alias.clone();
        }
        if over.get.is_some() {
            self.get = over.get.clone();
        }
        if over.validate.is_some() {
            self.validate = over.validate.clone();
        }
        if over.mz_validate.is_some() {
            self.mz_validate = over.mz_validate.clone();
        }
        if over.mz_required.is_some() {
            self.mz_required = over.mz_required.clone();
        }
        if over.keep_id.is_some() {
            self.keep_id = over.keep_id;
        }
        if over.cast_non_arrays.is_some() {
            self.cast_non_arrays = over.cast_non_arrays;
        }
        for (k, v) in &over.extra {
            self.extra.insert(k.clone(), v.clone());
        }
        self
    }

    /// Builder-style setters used at schema-authoring time
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = Some(immutable);
        self
    }

    pub fn with_required(mut self, required: RequiredSpec) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(DefaultSpec::Set(default));
        self
    }

    pub fn with_validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    pub fn with_mz_validate(mut self, validator: Validator) -> Self {
        self.mz_validate = Some(validator);
        self
    }

    pub fn with_mz_required(mut self, required: RequiredSpec) -> Self {
        self.mz_required = Some(required);
        self
    }

    pub fn with_getter(mut self, getter: Getter) -> Self {
        self.get = Some(getter);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Unknown-keys strictness of a generated (sub-)schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictMode {
    /// Unknown keys are dropped silently
    Strip,
    /// Unknown keys are a validation error
    Throw,
    /// Unknown keys are kept as-is
    Off,
}

/// Timestamp bookkeeping configuration.
///
/// A `None` field disables the corresponding timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timestamps {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Version-key handling of a generated schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKey {
    Disabled,
    Named(String),
}

/// Schema-level options of a generated model schema
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    /// Collection name
    pub collection: Option<String>,
    /// Key under which field types appear in raw-config renderings
    pub type_key: Option<String>,
    /// Unknown-keys strictness
    pub strict: Option<StrictMode>,
    /// Whether the schema exposes an `id` virtual
    pub id: Option<bool>,
    /// Timestamp bookkeeping
    pub timestamps: Option<Timestamps>,
    /// Version-key handling
    pub version_key: Option<VersionKey>,
    /// Passthrough options handed to the model layer untouched
    pub extra: BTreeMap<String, Value>,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `over` on top of `self`: set entries of `over` win.
    pub fn overlay(mut self, over: &SchemaOptions) -> Self {
        if over.collection.is_some() {
            self.collection = over.collection.clone();
        }
        if over.type_key.is_some() {
            self.type_key = over.type_key.clone();
        }
        if over.strict.is_some() {
            self.strict = over.strict;
        }
        if over.id.is_some() {
            self.id = over.id;
        }
        if over.timestamps.is_some() {
            self.timestamps = over.timestamps.clone();
        }
        if over.version_key.is_some() {
            self.version_key = over.version_key.clone();
        }
        for (k, v) in &over.extra {
            self.extra.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_strict(mut self, strict: StrictMode) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = Some(timestamps);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_set_entries_win() {
        let base = FieldOptions::new().with_index(true).with_unique(false);
        let over = FieldOptions::new().with_unique(true);

        let merged = base.overlay(&over);
        assert_eq!(merged.index, Some(true));
        assert_eq!(merged.unique, Some(true));
    }

    #[test]
    fn test_overlay_unset_entries_keep_base() {
        let base = FieldOptions::new().with_immutable(true);
        let merged = base.overlay(&FieldOptions::new());
        assert_eq!(merged.immutable, Some(true));
    }

    #[test]
    fn test_overlay_extra_merges_key_by_key() {
        let base = FieldOptions::new()
            .with_extra("a", json!(1))
            .with_extra("b", json!(2));
        let over = FieldOptions::new().with_extra("b", json!(3));

        let merged = base.overlay(&over);
        assert_eq!(merged.extra.get("a"), Some(&json!(1)));
        assert_eq!(merged.extra.get("b"), Some(&json!(3)));
    }

    #[test]
    fn test_schema_options_overlay() {
        let base = SchemaOptions::new()
            .with_collection("users")
            .with_strict(StrictMode::Strip);
        let over = SchemaOptions::new().with_strict(StrictMode::Throw);

        let merged = base.overlay(&over);
        assert_eq!(merged.collection.as_deref(), Some("users"));
        assert_eq!(merged.strict, Some(StrictMode::Throw));
    }

    #[test]
    fn test_required_spec_as_flag() {
        assert_eq!(RequiredSpec::flag(true).as_flag(), Some(true));
        assert_eq!(RequiredSpec::predicate(|_| true).as_flag(), None);
    }

    #[test]
    fn test_default_value_produce() {
        let fixed = DefaultValue::Value(json!(42));
        assert_eq!(fixed.produce(), json!(42));

        let produced = DefaultValue::Producer(Arc::new(|| json!("x")));
        assert_eq!(produced.produce(), json!("x"));
    }
}
