//! Schema unwrapping engine
//!
//! Strips transparent wrapper combinators off a node while accumulating the
//! semantic properties they encode into a flat [`SchemaFeatures`] set, and
//! returns the innermost node that matches no stripping rule.
//!
//! Accumulation is first-found-wins along the outside-in walk, both for
//! attached model options and for default values. For chained defaults that
//! means the outermost wrapper wins: `.default_value(1).default_value(2)`
//! resolves to `2`.

use crate::model::{DefaultValue, FieldOptions, SchemaOptions};
use crate::schema::{
    Effect, ModelMetadata, ObjectSchema, Schema, SchemaKind, UnknownKeys,
};

/// Array wrapping accumulated while unwrapping
#[derive(Debug, Clone)]
pub struct ArrayFeatures {
    /// Number of consecutive array wrappers stripped; always positive
    pub wrap_in_array_times: u32,
    /// The outermost array node, kept so the validation bridge can
    /// validate against the full array type rather than the element type
    pub original_array_schema: Schema,
}

/// Flat feature set accumulated for one node
#[derive(Debug, Clone, Default)]
pub struct SchemaFeatures {
    /// Default value, if any default wrapper was stripped
    pub default: Option<DefaultValue>,
    /// Whether an optional wrapper was stripped
    pub is_optional: bool,
    /// Unknown-keys mode stripped off an object node, if not the default
    pub unknown_keys: Option<UnknownKeys>,
    /// Member variant name of the first homogeneous union encountered
    pub union_member_kind: Option<&'static str>,
    /// Array wrapping, if any array wrapper was stripped
    pub array: Option<ArrayFeatures>,
    /// Nesting descriptor from a root-annotation wrapper
    pub metadata: Option<ModelMetadata>,
    /// Field-level model options found on a walked node
    pub field_options: Option<FieldOptions>,
    /// Schema-level model options found on a walked node
    pub schema_options: Option<SchemaOptions>,
}

/// Caller knobs for one unwrap call
#[derive(Debug, Clone, Copy, Default)]
pub struct UnwrapOptions {
    /// Leave array wrappers in place
    pub do_not_unwrap_arrays: bool,
}

/// Unwrap `schema`, returning the innermost unmatched node and the
/// accumulated features.
pub fn unwrap_schema(schema: &Schema, options: UnwrapOptions) -> (Schema, SchemaFeatures) {
    let mut features = SchemaFeatures::default();
    let mut current = schema.clone();

    loop {
        if features.field_options.is_none() {
            features.field_options = current.field_options().cloned();
        }
        if features.schema_options.is_none() {
            features.schema_options = current.schema_options().cloned();
        }
        if features.union_member_kind.is_none() {
            if let SchemaKind::Union(variants) = current.kind() {
                if let Some(first) = variants.first() {
                    let tag = first.type_name();
                    if variants.iter().all(|v| v.type_name() == tag) {
                        features.union_member_kind = Some(tag);
                    }
                }
            }
        }

        let Schema {
            kind,
            field_options,
            schema_options,
        } = current;

        current = match kind {
            SchemaKind::Annotated { inner, metadata } => {
                if features.metadata.is_none() {
                    features.metadata = Some(metadata);
                }
                *inner
            }
            SchemaKind::Object(object) if object.unknown_keys != UnknownKeys::Strip => {
                if features.unknown_keys.is_none() {
                    features.unknown_keys = Some(object.unknown_keys);
                }
                Schema {
                    kind: SchemaKind::Object(ObjectSchema {
                        shape: object.shape,
                        unknown_keys: UnknownKeys::Strip,
                    }),
                    field_options,
                    schema_options,
                }
            }
            SchemaKind::Optional(inner) => {
                features.is_optional = true;
                *inner
            }
            SchemaKind::Default { inner, value } => {
                if features.default.is_none() {
                    features.default = Some(value);
                }
                *inner
            }
            SchemaKind::Branded(inner) | SchemaKind::Nullable(inner) => *inner,
            SchemaKind::Effects {
                inner,
                effect: Effect::Refinement(_),
            } => *inner,
            SchemaKind::Array(inner) if !options.do_not_unwrap_arrays => {
                match features.array.as_mut() {
                    Some(array) => array.wrap_in_array_times += 1,
                    None => {
                        features.array = Some(ArrayFeatures {
                            wrap_in_array_times: 1,
                            original_array_schema: Schema {
                                kind: SchemaKind::Array(inner.clone()),
                                field_options: field_options.clone(),
                                schema_options: schema_options.clone(),
                            },
                        });
                    }
                }
                *inner
            }
            // No rule matched: this is the core node
            other => {
                return (
                    Schema {
                        kind: other,
                        field_options,
                        schema_options,
                    },
                    features,
                );
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build::*;
    use serde_json::json;

    fn unwrap(schema: &Schema) -> (Schema, SchemaFeatures) {
        unwrap_schema(schema, UnwrapOptions::default())
    }

    #[test]
    fn test_optional_and_default_commute() {
        let a = string().default_value(json!("d")).optional();
        let b = string().optional().default_value(json!("d"));

        for schema in [a, b] {
            let (core, features) = unwrap(&schema);
            assert!(matches!(core.kind(), SchemaKind::String));
            assert!(features.is_optional);
            match features.default {
                Some(DefaultValue::Value(v)) => assert_eq!(v, json!("d")),
                other => panic!("unexpected default: {:?}", other),
            }
        }
    }

    #[test]
    fn test_outermost_default_wins() {
        let schema = number()
            .default_value(json!(1))
            .default_value(json!(2))
            .default_value(json!(3));
        let (_, features) = unwrap(&schema);
        match features.default {
            Some(DefaultValue::Value(v)) => assert_eq!(v, json!(3)),
            other => panic!("unexpected default: {:?}", other),
        }
    }

    #[test]
    fn test_array_depth_and_original_schema() {
        let schema = number().array().array().array();
        let (core, features) = unwrap(&schema);

        assert!(matches!(core.kind(), SchemaKind::Number));
        let array = features.array.expect("array features");
        assert_eq!(array.wrap_in_array_times, 3);
        // The retained node is the outermost, triple-wrapped array
        assert!(array
            .original_array_schema
            .parse(&json!([[[1.0]]]))
            .is_ok());
        assert!(array.original_array_schema.parse(&json!([[1.0]])).is_err());
    }

    #[test]
    fn test_do_not_unwrap_arrays() {
        let schema = number().array();
        let (core, features) = unwrap_schema(
            &schema,
            UnwrapOptions {
                do_not_unwrap_arrays: true,
            },
        );
        assert!(matches!(core.kind(), SchemaKind::Array(_)));
        assert!(features.array.is_none());
    }

    #[test]
    fn test_strict_mode_recorded_and_stripped() {
        let schema = object(vec![("a", string())]).strict();
        let (core, features) = unwrap(&schema);

        assert_eq!(features.unknown_keys, Some(UnknownKeys::Strict));
        let SchemaKind::Object(obj) = core.kind() else {
            panic!("expected object core");
        };
        assert_eq!(obj.unknown_keys(), UnknownKeys::Strip);
    }

    #[test]
    fn test_nullable_does_not_set_optional() {
        let (core, features) = unwrap(&string().nullable());
        assert!(matches!(core.kind(), SchemaKind::String));
        assert!(!features.is_optional);
    }

    #[test]
    fn test_refinement_effects_are_stripped() {
        let (core, features) = unwrap(&string().min_length(6).optional());
        assert!(matches!(core.kind(), SchemaKind::String));
        assert!(features.is_optional);
    }

    #[test]
    fn test_transform_effects_are_terminal() {
        let (core, _) = unwrap(&string().transform());
        assert!(matches!(core.kind(), SchemaKind::Effects { .. }));
    }

    #[test]
    fn test_annotation_metadata_recorded() {
        use crate::model::SchemaOptions;
        use crate::schema::ModelMetadata;

        let schema = annotate_as_root(
            object(vec![("a", number())]),
            ModelMetadata::new()
                .with_schema_options(SchemaOptions::new().with_collection("things")),
        )
        .unwrap();

        let (core, features) = unwrap(&schema);
        assert!(matches!(core.kind(), SchemaKind::Object(_)));
        let metadata = features.metadata.expect("metadata");
        assert_eq!(
            metadata
                .schema_options
                .as_ref()
                .and_then(|o| o.collection.as_deref()),
            Some("things")
        );
    }

    #[test]
    fn test_first_found_field_options_win() {
        use crate::model::FieldOptions;

        let schema = string()
            .with_field_options(FieldOptions::new().with_index(false))
            .optional()
            .with_field_options(FieldOptions::new().with_index(true));

        let (_, features) = unwrap(&schema);
        assert_eq!(features.field_options.unwrap().index, Some(true));
    }

    #[test]
    fn test_homogeneous_union_member_kind() {
        let homogeneous = union(vec![number(), number()]);
        let (_, features) = unwrap(&homogeneous);
        assert_eq!(features.union_member_kind, Some("number"));

        let mixed = union(vec![number(), string()]);
        let (_, features) = unwrap(&mixed);
        assert_eq!(features.union_member_kind, None);
    }
}
