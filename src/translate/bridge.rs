//! Validation bridge
//!
//! Every assembled field carries a model-layer validator that re-parses the
//! runtime value through the original validation schema for that field. The
//! coarse field-type token only guarantees shape; the bridge closes the gap
//! by re-running refinements, custom messages and nested-object exactness on
//! every write.

use std::sync::Arc;

use serde_json::Value;

use crate::model::values;
use crate::model::{StrictMode, Validator, ValidatorKind};
use crate::schema::{Schema, SchemaKind};

/// Apply the resolved unknown-keys strictness to an object schema before
/// parsing. Non-object schemas are returned untouched.
fn apply_strictness(schema: Schema, strict: StrictMode) -> Schema {
    if !matches!(schema.kind(), SchemaKind::Object(_)) {
        return schema;
    }
    match strict {
        StrictMode::Throw => schema.strict(),
        StrictMode::Strip => schema.strip(),
        StrictMode::Off => schema.passthrough(),
    }
}

/// Build the bridge validator for one field.
///
/// `schema` is the original schema for the field: the outermost array node
/// when the field was array-wrapped, the full field schema otherwise.
/// `strict` is the unknown-keys strictness resolved during assembly; it only
/// matters for object-shaped fields.
pub(crate) fn bridge_validator(schema: Schema, strict: StrictMode) -> Validator {
    let effective = apply_strictness(schema, strict);
    let parse: Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync> =
        Arc::new(move |value: &Value| {
            // Stored binary wrappers are rewritten back to their raw form
            // before re-parsing; the value is only copied if a rewrite
            // actually happened.
            let result = match values::unwrap_binary_values(value) {
                Some(rewritten) => effective.parse(&rewritten),
                None => effective.parse(value),
            };
            result.map_err(|e| e.to_string())
        });
    Validator {
        kind: ValidatorKind::Parse(parse),
        message: None,
    }
}
