//! Type-mapping policy
//!
//! Pure decision table from an unwrapped core node to a model field-type
//! token. Object cores never reach this table; the assembly driver turns
//! them into sub-schemas before mapping.

use crate::error::{TranslationError, TranslationResult};
use crate::model::FieldType;
use crate::schema::{Effect, EnumValue, Literal, OpaqueClass, Schema, SchemaKind};

use super::unwrap::SchemaFeatures;

fn primitive_token(tag: &str) -> Option<FieldType> {
    match tag {
        "number" => Some(FieldType::Number),
        "string" => Some(FieldType::String),
        "date" => Some(FieldType::Date),
        "boolean" => Some(FieldType::Boolean),
        _ => None,
    }
}

fn class_token(class: &OpaqueClass) -> FieldType {
    match class {
        OpaqueClass::Buffer => FieldType::Buffer,
        OpaqueClass::ObjectId => FieldType::ObjectId,
        OpaqueClass::Decimal128 => FieldType::Decimal128,
        OpaqueClass::Uuid => FieldType::Uuid,
        OpaqueClass::External(name) => FieldType::External(name.clone()),
    }
}

/// Map an unwrapped core node to a field-type token, or report the node as
/// unsupported at `path`.
pub(crate) fn map_field_type(
    core: &Schema,
    features: &SchemaFeatures,
    path: &str,
) -> TranslationResult<FieldType> {
    let token = match core.kind() {
        SchemaKind::Number => FieldType::Number,
        SchemaKind::String => FieldType::String,
        SchemaKind::Date => FieldType::Date,
        SchemaKind::Boolean => FieldType::Boolean,

        SchemaKind::Union(_) => match features.union_member_kind.and_then(primitive_token) {
            Some(token) => token,
            None => FieldType::Mixed,
        },

        SchemaKind::Literal(literal) => match literal {
            Literal::Bool(_) => FieldType::Boolean,
            Literal::Number(n) if n.is_nan() => FieldType::Mixed,
            Literal::Number(n) if n.is_finite() => FieldType::Number,
            Literal::Number(_) => {
                return Err(TranslationError::unsupported(path, "literal"));
            }
            Literal::String(_) => FieldType::String,
            Literal::Null => FieldType::Mixed,
            Literal::Undefined | Literal::BigInt(_) => {
                return Err(TranslationError::unsupported(path, "literal"));
            }
        },

        SchemaKind::Enum(values) => {
            if values.is_empty() {
                return Err(TranslationError::unsupported_with_remark(
                    path,
                    "enum",
                    "empty enumerations cannot be represented",
                ));
            }
            FieldType::String
        }

        SchemaKind::NativeEnum(members) => {
            if members.is_empty() {
                return Err(TranslationError::unsupported_with_remark(
                    path,
                    "native enum",
                    "empty enumerations cannot be represented",
                ));
            }
            let numeric = members
                .iter()
                .all(|(_, v)| matches!(v, EnumValue::Number(_)));
            let textual = members
                .iter()
                .all(|(_, v)| matches!(v, EnumValue::String(_)));
            if numeric {
                FieldType::Number
            } else if textual {
                FieldType::String
            } else {
                FieldType::Mixed
            }
        }

        SchemaKind::Null | SchemaKind::Nan => FieldType::Mixed,

        SchemaKind::Map { .. } => FieldType::Map,

        SchemaKind::Any { class: Some(class) } => class_token(class),
        SchemaKind::Any { class: None } | SchemaKind::Unknown => FieldType::Mixed,

        SchemaKind::Record { .. }
        | SchemaKind::Tuple(_)
        | SchemaKind::DiscriminatedUnion { .. }
        | SchemaKind::Intersection(_, _) => FieldType::Mixed,

        SchemaKind::Effects { effect, .. } => {
            // Refinement wrappers are stripped during unwrapping, so an
            // effects core is always a transform or preprocessor.
            debug_assert!(!matches!(effect, Effect::Refinement(_)));
            return Err(TranslationError::unsupported_with_remark(
                path,
                "effects",
                "only refinements are supported",
            ));
        }

        SchemaKind::Object(_) => {
            return Err(TranslationError::other(format!(
                "Path `{path}`: object fields must be assembled as sub-schemas"
            )));
        }

        other => {
            return Err(TranslationError::unsupported(path, other.type_name()));
        }
    };
    Ok(token)
}
