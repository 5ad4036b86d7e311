//! Validation Bridge Tests
//!
//! End-to-end write validation through a generated model schema:
//! - Refinements and custom messages survive translation
//! - Object exactness is enforced per the resolved strictness
//! - Array fields validate against the full original array schema
//! - Per-field failures aggregate instead of aborting siblings
//! - Update-style validation passes no document context to predicates

use schemabind::model::{FieldOptions, Validator, ValidationMode};
use schemabind::schema::build::*;
use schemabind::schema::{instance_of, ModelMetadata, OpaqueClass};
use schemabind::translate::{to_model_schema_with, TranslateOptions};
use schemabind::{ModelSchema, Schema};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn translate(root: Schema) -> ModelSchema {
    let annotated = annotate_as_root(root, ModelMetadata::new()).unwrap();
    to_model_schema_with(&annotated, &TranslateOptions::default()).unwrap()
}

// =============================================================================
// Refinement Round-Trip Tests
// =============================================================================

/// The coarse field type alone would accept these writes; the bridge
/// re-runs the original refinements and rejects them.
#[test]
fn test_refinements_enforced_on_write() {
    let model = translate(object(vec![
        ("username", string().min_length(3)),
        ("age", number().int().min(0.0)),
    ]));

    assert!(model
        .validate_document(&json!({"username": "ada", "age": 36}))
        .is_ok());

    let report = model
        .validate_document(&json!({"username": "x", "age": -1}))
        .unwrap_err();
    assert!(!report.errors_for("username").is_empty());
    assert!(!report.errors_for("age").is_empty());
}

/// Custom refinement messages reach the final report.
#[test]
fn test_custom_messages_survive() {
    let model = translate(object(vec![(
        "code",
        string().refine_with_message(|v| v.as_str().map_or(false, |s| s.len() == 4), "expected a 4-char code"),
    )]));

    let report = model.validate_document(&json!({"code": "abc"})).unwrap_err();
    assert!(report.errors_for("code")[0].contains("4-char code"));
}

// =============================================================================
// Object Exactness Tests
// =============================================================================

/// Unknown keys inside a nested object are rejected under the default
/// handling, with the inner path in the message.
#[test]
fn test_nested_object_exactness() {
    let model = translate(object(vec![(
        "address",
        object(vec![("city", string())]),
    )]));

    assert!(model
        .validate_document(&json!({"address": {"city": "Oslo"}}))
        .is_ok());

    let report = model
        .validate_document(&json!({"address": {"city": "Oslo", "stray": 1}}))
        .unwrap_err();
    assert!(report.errors_for("address")[0].contains("stray"));
}

/// Unknown keys at the root are caught by the schema's own strictness.
#[test]
fn test_root_exactness() {
    let model = translate(object(vec![("a", string())]));
    let report = model
        .validate_document(&json!({"a": "x", "stray": true}))
        .unwrap_err();
    assert_eq!(report.errors_for("stray"), ["unknown field"]);
}

// =============================================================================
// Array Tests
// =============================================================================

/// The bridge validates the whole array value, element refinements
/// included, not just the element type token.
#[test]
fn test_array_validated_as_a_whole() {
    let model = translate(object(vec![("scores", number().min(0.0).array())]));

    assert!(model
        .validate_document(&json!({"scores": [1, 2, 3]}))
        .is_ok());
    let report = model
        .validate_document(&json!({"scores": [1, -2]}))
        .unwrap_err();
    assert!(!report.errors_for("scores").is_empty());
}

// =============================================================================
// Binary Wrapper Tests
// =============================================================================

/// Values read back in the model layer's internal binary form still pass
/// the original instance check after the bridge's unwrap step.
#[test]
fn test_stored_binary_form_accepted() {
    let model = translate(object(vec![(
        "blob",
        object(vec![("payload", instance_of(OpaqueClass::Buffer, None))]),
    )]));

    let stored = json!({
        "blob": {"payload": {"$binary": {"base64": "aGVsbG8=", "subType": 0}}}
    });
    assert!(model.validate_document(&stored).is_ok());

    let wire = json!({"blob": {"payload": {"$binary": "aGVsbG8="}}});
    assert!(model.validate_document(&wire).is_ok());

    let wrong = json!({"blob": {"payload": "plain string"}});
    assert!(model.validate_document(&wrong).is_err());
}

// =============================================================================
// Aggregation Tests
// =============================================================================

/// A failing field never hides its siblings' failures.
#[test]
fn test_failures_aggregate_per_field() {
    let model = translate(object(vec![
        ("a", string().min_length(5)),
        ("b", number().min(10.0)),
        ("c", boolean()),
    ]));

    let report = model
        .validate_document(&json!({"a": "xy", "b": 3, "c": true}))
        .unwrap_err();
    assert_eq!(report.len(), 2);
    assert!(!report.errors_for("a").is_empty());
    assert!(!report.errors_for("b").is_empty());
}

// =============================================================================
// Document Context Tests
// =============================================================================

/// Author-supplied predicates see the full document when validating an
/// instance and nothing during update-style validation.
#[test]
fn test_predicates_lose_context_in_update_mode() {
    let options = FieldOptions::new().with_mz_validate(
        Validator::predicate(|doc, _| {
            // Requires a sibling only when a live document is visible
            match doc {
                Some(doc) => doc.get("flag").is_some(),
                None => true,
            }
        }),
    );
    let model = translate(object(vec![
        ("value", string().with_field_options(options)),
        ("flag", boolean().optional()),
    ]));

    let without_flag = json!({"value": "x"});
    assert!(model
        .validate(&without_flag, ValidationMode::Document)
        .is_err());
    assert!(model
        .validate(&without_flag, ValidationMode::Update)
        .is_ok());
    assert!(model
        .validate_document(&json!({"value": "x", "flag": true}))
        .is_ok());
}
