//! Translation Shape Tests
//!
//! End-to-end checks that a composed validation schema translates into the
//! expected model-schema tree:
//! - Wrapper unwrapping feeds requiredness and defaults
//! - Array wrapping depth is preserved exactly
//! - Nested objects become sub-schemas with identity suppression
//! - Unsupported variants fail with the offending dotted path
//! - Translation is deterministic

use schemabind::model::{DefaultSpec, DefaultValue, FieldType, Getter, StrictMode};
use schemabind::schema::build::*;
use schemabind::schema::{instance_of, EnumValue, ModelMetadata, OpaqueClass};
use schemabind::translate::{to_model_schema_with, TranslateOptions, UnknownKeysHandling};
use schemabind::{ModelSchema, Schema, TranslationError, TranslationResult};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn translate(root: Schema) -> TranslationResult<ModelSchema> {
    let annotated = annotate_as_root(root, ModelMetadata::new())?;
    to_model_schema_with(&annotated, &TranslateOptions::default())
}

fn user_schema() -> Schema {
    object(vec![
        ("username", string().min_length(3)),
        ("email", string().email().optional()),
        ("age", number().int().min(0.0).optional()),
        ("active", boolean().default_value(json!(true))),
        ("roles", string_enum(vec!["admin", "member"]).array()),
        (
            "address",
            object(vec![("city", string()), ("zip", string().optional())]),
        ),
        ("avatar", instance_of(OpaqueClass::Buffer, None).optional()),
        ("joined", date()),
    ])
}

// =============================================================================
// Field Shape Tests
// =============================================================================

/// Every field of a realistic schema resolves to the documented token.
#[test]
fn test_full_schema_field_types() {
    let model = translate(user_schema()).unwrap();

    assert!(matches!(
        model.field("username").unwrap().field_type,
        FieldType::String
    ));
    assert!(matches!(
        model.field("age").unwrap().field_type,
        FieldType::Number
    ));
    assert!(matches!(
        model.field("active").unwrap().field_type,
        FieldType::Boolean
    ));
    assert!(matches!(
        model.field("joined").unwrap().field_type,
        FieldType::Date
    ));
    assert!(matches!(
        model.field("avatar").unwrap().field_type,
        FieldType::Buffer
    ));

    let roles = &model.field("roles").unwrap().field_type;
    assert_eq!(roles.array_depth(), 1);
    assert!(matches!(roles.innermost(), FieldType::String));

    assert!(model.field("address").unwrap().field_type.as_subdocument().is_some());
}

/// Optionality and defaults from wrappers drive requiredness.
#[test]
fn test_requiredness_follows_wrappers() {
    let model = translate(user_schema()).unwrap();

    let required = |name: &str| {
        model
            .field(name)
            .unwrap()
            .options
            .required
            .as_ref()
            .unwrap()
            .as_flag()
    };
    assert_eq!(required("username"), Some(true));
    assert_eq!(required("email"), Some(false));
    assert_eq!(required("active"), Some(true));
}

/// Defaults survive translation; containers without one get an explicit
/// unset entry.
#[test]
fn test_default_entries() {
    let model = translate(user_schema()).unwrap();

    match &model.field("active").unwrap().options.default {
        Some(DefaultSpec::Set(DefaultValue::Value(v))) => assert_eq!(v, &json!(true)),
        other => panic!("unexpected default: {:?}", other),
    }
    assert!(matches!(
        model.field("roles").unwrap().options.default,
        Some(DefaultSpec::Unset)
    ));
    assert!(model.field("username").unwrap().options.default.is_none());
}

/// Multidimensional arrays keep their exact depth.
#[test]
fn test_multidimensional_arrays() {
    let model = translate(object(vec![("grid", number().array().array().array())])).unwrap();
    let grid = &model.field("grid").unwrap().field_type;
    assert_eq!(grid.array_depth(), 3);
    assert!(matches!(grid.innermost(), FieldType::Number));
    assert_eq!(model.field("grid").unwrap().options.cast_non_arrays, Some(false));
}

/// Binary fields get the read-time unwrap getter automatically.
#[test]
fn test_buffer_getter_attached() {
    let model = translate(user_schema()).unwrap();
    assert!(matches!(
        model.field("avatar").unwrap().options.get,
        Some(Getter::UnwrapBinary)
    ));
}

// =============================================================================
// Nesting Tests
// =============================================================================

/// Sub-schemas suppress their identity field and inherit strictness.
#[test]
fn test_subdocument_options() {
    let model = translate(user_schema()).unwrap();
    let address = model
        .field("address")
        .unwrap()
        .field_type
        .as_subdocument()
        .unwrap();

    assert_eq!(address.options().id, Some(false));
    assert_eq!(address.options().strict, Some(StrictMode::Throw));
    assert!(address.field("city").is_some());
    assert_eq!(
        address
            .field("zip")
            .unwrap()
            .options
            .required
            .as_ref()
            .unwrap()
            .as_flag(),
        Some(false)
    );
}

/// Arrays of objects nest a sub-schema inside the array token.
#[test]
fn test_array_of_objects() {
    let model = translate(object(vec![(
        "entries",
        object(vec![("k", string()), ("v", number())]).array(),
    )]))
    .unwrap();

    let entries = &model.field("entries").unwrap().field_type;
    assert_eq!(entries.array_depth(), 1);
    let sub = entries.innermost().as_subdocument().unwrap();
    assert_eq!(sub.len(), 2);
}

// =============================================================================
// Mapping Policy Tests
// =============================================================================

/// Enum and union variants resolve to their documented tokens.
#[test]
fn test_enum_and_union_tokens() {
    let model = translate(object(vec![
        ("level", native_enum(vec![
            ("Low", EnumValue::Number(0.0)),
            ("High", EnumValue::Number(1.0)),
        ])),
        ("status", union(vec![string(), string()])),
        ("anything", union(vec![string(), number()])),
        ("attrs", map(Some(string()), Some(number()))),
    ]))
    .unwrap();

    assert!(matches!(model.field("level").unwrap().field_type, FieldType::Number));
    assert!(matches!(model.field("status").unwrap().field_type, FieldType::String));
    assert!(matches!(model.field("anything").unwrap().field_type, FieldType::Mixed));
    assert!(matches!(model.field("attrs").unwrap().field_type, FieldType::Map));
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Unsupported variants are rejected with the full dotted path.
#[test]
fn test_unsupported_variant_names_path() {
    let err = translate(object(vec![(
        "outer",
        object(vec![("inner", set(number()).optional())]),
    )]))
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("outer.inner"), "message: {}", message);
    assert!(message.contains("set"));
}

/// Transforms and preprocessors do not survive translation.
#[test]
fn test_non_refinement_effects_rejected() {
    let err = translate(object(vec![("x", string().transform())])).unwrap_err();
    assert!(err.to_string().contains("only refinements are supported"));
}

/// A root without annotation, or a non-object root, is refused up front.
#[test]
fn test_invalid_roots() {
    let unannotated = to_model_schema_with(
        &object(vec![("a", string())]),
        &TranslateOptions::default(),
    );
    assert!(matches!(unannotated, Err(TranslationError::InvalidRoot)));

    assert!(annotate_as_root(string(), ModelMetadata::new()).is_err());
}

/// A failing field aborts the whole call; no partial schema is returned.
#[test]
fn test_first_error_is_terminal() {
    let result = translate(object(vec![
        ("good", string()),
        ("bad", bigint()),
    ]));
    assert!(result.is_err());
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Repeated translation of the same schema yields the same shape.
#[test]
fn test_translation_is_deterministic() {
    let reference = translate(user_schema()).unwrap();
    let names: Vec<String> = reference.fields().map(|(n, _)| n.clone()).collect();

    for _ in 0..20 {
        let model = translate(user_schema()).unwrap();
        let again: Vec<String> = model.fields().map(|(n, _)| n.clone()).collect();
        assert_eq!(again, names);
    }
}

// =============================================================================
// Unknown-Keys Handling Tests
// =============================================================================

/// Each handling mode resolves root and nested strictness as documented.
#[test]
fn test_unknown_keys_handling_modes() {
    let build_root = || {
        annotate_as_root(
            object(vec![("sub", object(vec![("x", number())]))]),
            ModelMetadata::new(),
        )
        .unwrap()
    };
    let strict_of = |model: &ModelSchema| {
        (
            model.options().strict,
            model
                .field("sub")
                .unwrap()
                .field_type
                .as_subdocument()
                .unwrap()
                .options()
                .strict,
        )
    };

    let translate_as = |mode: UnknownKeysHandling| {
        let options = TranslateOptions {
            unknown_keys: mode,
            ..TranslateOptions::default()
        };
        to_model_schema_with(&build_root(), &options).unwrap()
    };

    assert_eq!(
        strict_of(&translate_as(UnknownKeysHandling::Throw)),
        (Some(StrictMode::Throw), Some(StrictMode::Throw))
    );
    assert_eq!(
        strict_of(&translate_as(UnknownKeysHandling::Strip)),
        (Some(StrictMode::Strip), Some(StrictMode::Strip))
    );
    assert_eq!(
        strict_of(&translate_as(UnknownKeysHandling::StripUnlessOverridden)),
        (Some(StrictMode::Strip), Some(StrictMode::Strip))
    );
    assert_eq!(
        strict_of(&translate_as(UnknownKeysHandling::StripUnlessOverriddenOrRoot)),
        (Some(StrictMode::Throw), Some(StrictMode::Strip))
    );
}
