//! Document validation against a generated model schema
//!
//! Validation semantics:
//! - Required fields must be present (a declared default satisfies
//!   requiredness)
//! - Present values must match their field-type token exactly, with no
//!   coercion
//! - Every registered validator runs; null values skip type checks and
//!   validators (only requiredness applies to them)
//! - Failures are aggregated per field path; sibling fields are always
//!   checked
//!
//! The walk is deterministic and does not mutate documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::options::{DefaultSpec, RequiredKind, StrictMode, Validator, ValidatorKind};
use super::types::{FieldEntry, FieldType, ModelSchema};
use super::values;

/// How a validation pass is being invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Validating a full document instance; predicates see the document
    Document,
    /// Validating an update payload; no live document exists and
    /// predicates receive no context
    Update,
}

/// All failures of one validation pass, keyed by dotted field path
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// Record a failure for a field path
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(path.into()).or_default().push(message.into());
    }

    /// Failures recorded for one field path
    pub fn errors_for(&self, path: &str) -> &[String] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of field paths with at least one failure
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate failures in deterministic (path) order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed:")?;
        for (path, messages) in &self.errors {
            for message in messages {
                write!(f, " [{}: {}]", path, message)?;
            }
        }
        Ok(())
    }
}

impl ModelSchema {
    /// Validate a full document instance against this schema.
    pub fn validate_document(&self, document: &Value) -> Result<(), ValidationReport> {
        self.validate(document, ValidationMode::Document)
    }

    /// Validate a document or update payload.
    ///
    /// In [`ValidationMode::Update`] validator and requiredness predicates
    /// receive no document context.
    pub fn validate(&self, document: &Value, mode: ValidationMode) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();

        let doc_obj = match document.as_object() {
            Some(obj) => obj,
            None => {
                report.add("$root", "expected an object document");
                return Err(report);
            }
        };

        let doc_ctx = match mode {
            ValidationMode::Document => Some(document),
            ValidationMode::Update => None,
        };

        // Undeclared keys per the schema's strictness
        if self.options().strict == Some(StrictMode::Throw) {
            for key in doc_obj.keys() {
                if self.field(key).is_none() {
                    report.add(key.clone(), "unknown field");
                }
            }
        }

        for (name, entry) in self.fields() {
            validate_field(name, entry, doc_obj.get(name), doc_ctx, &mut report);
        }

        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

fn validate_field(
    path: &str,
    entry: &FieldEntry,
    value: Option<&Value>,
    doc_ctx: Option<&Value>,
    report: &mut ValidationReport,
) {
    let value = match value {
        Some(v) => v,
        None => {
            let has_default = matches!(entry.options.default, Some(DefaultSpec::Set(_)));
            if !has_default && is_required(entry, doc_ctx) {
                let message = entry
                    .options
                    .required
                    .as_ref()
                    .and_then(|spec| spec.message.clone())
                    .unwrap_or_else(|| "is required".to_string());
                report.add(path, message);
            }
            return;
        }
    };

    // Null skips type checks and validators; requiredness alone governs it
    if value.is_null() {
        return;
    }

    check_type(path, &entry.field_type, value, doc_ctx, report);

    for validator in &entry.validators {
        run_validator(path, validator, value, doc_ctx, report);
    }
}

fn is_required(entry: &FieldEntry, doc_ctx: Option<&Value>) -> bool {
    match &entry.options.required {
        Some(spec) => match &spec.required {
            RequiredKind::Flag(b) => *b,
            RequiredKind::Predicate(f) => f(doc_ctx),
        },
        None => false,
    }
}

fn check_type(
    path: &str,
    field_type: &FieldType,
    value: &Value,
    doc_ctx: Option<&Value>,
    report: &mut ValidationReport,
) {
    match field_type {
        FieldType::String => {
            if !value.is_string() {
                report.add(path, type_mismatch("string", value));
            }
        }
        FieldType::Number => {
            if !value.is_number() {
                report.add(path, type_mismatch("number", value));
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                report.add(path, type_mismatch("boolean", value));
            }
        }
        FieldType::Date => {
            if !values::is_date(value) {
                report.add(path, type_mismatch("date", value));
            }
        }
        FieldType::Mixed | FieldType::External(_) => {}
        FieldType::Map => {
            if !value.is_object() {
                report.add(path, type_mismatch("map", value));
            }
        }
        FieldType::Buffer => {
            if !values::is_binary(value) && !values::is_internal_binary(value) {
                report.add(path, type_mismatch("buffer", value));
            }
        }
        FieldType::ObjectId => {
            if !values::is_object_id(value) {
                report.add(path, type_mismatch("objectid", value));
            }
        }
        FieldType::Decimal128 => {
            if !values::is_decimal128(value) {
                report.add(path, type_mismatch("decimal128", value));
            }
        }
        FieldType::Uuid => {
            if !values::is_uuid(value) {
                report.add(path, type_mismatch("uuid", value));
            }
        }
        FieldType::Subdocument(schema) => match schema.validate(
            value,
            if doc_ctx.is_some() {
                ValidationMode::Document
            } else {
                ValidationMode::Update
            },
        ) {
            Ok(()) => {}
            Err(sub_report) => {
                for (sub_path, messages) in sub_report.iter() {
                    for message in messages {
                        report.add(format!("{}.{}", path, sub_path), message.clone());
                    }
                }
            }
        },
        FieldType::Array(element) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.is_null() {
                        continue;
                    }
                    check_type(&format!("{}.{}", path, i), element, item, doc_ctx, report);
                }
            }
            None => report.add(path, type_mismatch("array", value)),
        },
    }
}

fn run_validator(
    path: &str,
    validator: &Validator,
    value: &Value,
    doc_ctx: Option<&Value>,
    report: &mut ValidationReport,
) {
    let failure = match &validator.kind {
        ValidatorKind::Pattern(regex) => match value.as_str() {
            Some(text) if regex.is_match(text) => None,
            _ => Some("validator failed".to_string()),
        },
        ValidatorKind::Predicate(f) => {
            if f(doc_ctx, value) {
                None
            } else {
                Some("validator failed".to_string())
            }
        }
        ValidatorKind::Parse(f) => f(value).err(),
    };

    if let Some(default_message) = failure {
        let message = validator.message.clone().unwrap_or(default_message);
        report.add(path, message);
    }
}

fn type_mismatch(expected: &str, actual: &Value) -> String {
    format!("expected {}, got {}", expected, json_type_name(actual))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
