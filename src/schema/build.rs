//! Combinator constructors and wrapper methods
//!
//! Leaf constructors are free functions (`string()`, `number()`, ...);
//! wrapping combinators are methods on [`Schema`] producing a new node that
//! owns the wrapped one. Convenience refinements (`min_length`, `min`,
//! `email`, ...) are ordinary refinement wrappers and behave identically to
//! `refine`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{TranslationError, TranslationResult};
use crate::model::{DefaultValue, FieldOptions, SchemaOptions};

use super::node::{
    Effect, EnumValue, Literal, ModelMetadata, ObjectSchema, Refinement, Schema, SchemaKind,
    UnknownKeys,
};

/// String schema
pub fn string() -> Schema {
    Schema::from_kind(SchemaKind::String)
}

/// Number schema
pub fn number() -> Schema {
    Schema::from_kind(SchemaKind::Number)
}

/// Boolean schema
pub fn boolean() -> Schema {
    Schema::from_kind(SchemaKind::Boolean)
}

/// Date schema (RFC 3339 strings at runtime)
pub fn date() -> Schema {
    Schema::from_kind(SchemaKind::Date)
}

/// Literal schema matching exactly one value
pub fn literal(value: Literal) -> Schema {
    Schema::from_kind(SchemaKind::Literal(value))
}

/// String enumeration
pub fn string_enum<I, S>(values: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Schema::from_kind(SchemaKind::Enum(
        values.into_iter().map(Into::into).collect(),
    ))
}

/// Native enumeration: named members with string or numeric values
pub fn native_enum<I, S>(members: I) -> Schema
where
    I: IntoIterator<Item = (S, EnumValue)>,
    S: Into<String>,
{
    Schema::from_kind(SchemaKind::NativeEnum(
        members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
    ))
}

/// Null schema
pub fn null() -> Schema {
    Schema::from_kind(SchemaKind::Null)
}

/// NaN schema
pub fn nan() -> Schema {
    Schema::from_kind(SchemaKind::Nan)
}

/// Object schema from (name, member) pairs
pub fn object<I, S>(members: I) -> Schema
where
    I: IntoIterator<Item = (S, Schema)>,
    S: Into<String>,
{
    let shape: BTreeMap<String, Schema> =
        members.into_iter().map(|(k, v)| (k.into(), v)).collect();
    Schema::from_kind(SchemaKind::Object(ObjectSchema {
        shape,
        unknown_keys: UnknownKeys::Strip,
    }))
}

/// Union of alternatives
pub fn union(variants: Vec<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Union(variants))
}

/// Discriminated union over a tag member
pub fn discriminated_union(tag: impl Into<String>, variants: Vec<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::DiscriminatedUnion {
        tag: tag.into(),
        variants,
    })
}

/// Free-form map with optional key/value schemas
pub fn map(key: Option<Schema>, value: Option<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Map {
        key: key.map(Box::new),
        value: value.map(Box::new),
    })
}

/// Record: string keys, uniform value schema
pub fn record(value: Schema) -> Schema {
    Schema::from_kind(SchemaKind::Record {
        value: Box::new(value),
    })
}

/// Fixed-length positional tuple
pub fn tuple(items: Vec<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Tuple(items))
}

/// Intersection of two schemas
pub fn intersection(left: Schema, right: Schema) -> Schema {
    Schema::from_kind(SchemaKind::Intersection(Box::new(left), Box::new(right)))
}

/// Any: accepts every value
pub fn any() -> Schema {
    Schema::from_kind(SchemaKind::Any { class: None })
}

/// Unknown: accepts every value
pub fn unknown() -> Schema {
    Schema::from_kind(SchemaKind::Unknown)
}

/// Undefined schema (unsupported by the mapping policy)
pub fn undefined() -> Schema {
    Schema::from_kind(SchemaKind::Undefined)
}

/// Void schema (unsupported by the mapping policy)
pub fn void() -> Schema {
    Schema::from_kind(SchemaKind::Void)
}

/// Bigint schema (unsupported by the mapping policy)
pub fn bigint() -> Schema {
    Schema::from_kind(SchemaKind::BigInt)
}

/// Never schema: rejects every value
pub fn never() -> Schema {
    Schema::from_kind(SchemaKind::Never)
}

/// Set schema (unsupported by the mapping policy)
pub fn set(element: Schema) -> Schema {
    Schema::from_kind(SchemaKind::Set(Box::new(element)))
}

/// Promise schema (unsupported by the mapping policy)
pub fn promise(inner: Schema) -> Schema {
    Schema::from_kind(SchemaKind::Promise(Box::new(inner)))
}

/// Function schema (unsupported by the mapping policy)
pub fn function() -> Schema {
    Schema::from_kind(SchemaKind::Function)
}

/// Lazy schema (unsupported by the mapping policy)
pub fn lazy() -> Schema {
    Schema::from_kind(SchemaKind::Lazy)
}

impl Schema {
    /// Allow the value to be absent
    pub fn optional(self) -> Schema {
        Schema::from_kind(SchemaKind::Optional(Box::new(self)))
    }

    /// Allow the value to be null
    pub fn nullable(self) -> Schema {
        Schema::from_kind(SchemaKind::Nullable(Box::new(self)))
    }

    /// Supply a default for absent values.
    ///
    /// Chained defaults resolve outermost-first: `.default_value(1)
    /// .default_value(2)` yields `2`, because the wrapper applied last sits
    /// outermost and unwrapping keeps the first default it encounters.
    pub fn default_value(self, value: impl Into<DefaultValue>) -> Schema {
        Schema::from_kind(SchemaKind::Default {
            inner: Box::new(self),
            value: value.into(),
        })
    }

    /// Brand the schema (no runtime effect)
    pub fn branded(self) -> Schema {
        Schema::from_kind(SchemaKind::Branded(Box::new(self)))
    }

    /// Wrap in an array
    pub fn array(self) -> Schema {
        Schema::from_kind(SchemaKind::Array(Box::new(self)))
    }

    /// Attach a refinement predicate
    pub fn refine(self, check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Schema {
        self.refine_with(Refinement::new(check))
    }

    /// Attach a refinement with a custom failure message
    pub fn refine_with_message(
        self,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Schema {
        self.refine_with(Refinement::new(check).with_message(message))
    }

    pub(crate) fn refine_with(self, refinement: Refinement) -> Schema {
        Schema::from_kind(SchemaKind::Effects {
            inner: Box::new(self),
            effect: Effect::Refinement(refinement),
        })
    }

    /// Attach a transform effect (unsupported by the mapping policy)
    pub fn transform(self) -> Schema {
        Schema::from_kind(SchemaKind::Effects {
            inner: Box::new(self),
            effect: Effect::Transform,
        })
    }

    /// Attach a preprocess effect (unsupported by the mapping policy)
    pub fn preprocess(self) -> Schema {
        Schema::from_kind(SchemaKind::Effects {
            inner: Box::new(self),
            effect: Effect::Preprocess,
        })
    }

    /// Minimum string length refinement
    pub fn min_length(self, min: usize) -> Schema {
        self.refine_with(
            Refinement::new(move |v| v.as_str().map_or(false, |s| s.chars().count() >= min))
                .with_message(format!("must contain at least {} character(s)", min)),
        )
    }

    /// Maximum string length refinement
    pub fn max_length(self, max: usize) -> Schema {
        self.refine_with(
            Refinement::new(move |v| v.as_str().map_or(false, |s| s.chars().count() <= max))
                .with_message(format!("must contain at most {} character(s)", max)),
        )
    }

    /// Rudimentary email shape refinement
    pub fn email(self) -> Schema {
        self.refine_with(
            Refinement::new(|v| {
                v.as_str().map_or(false, |s| {
                    let mut parts = s.splitn(2, '@');
                    let local = parts.next().unwrap_or("");
                    let domain = parts.next().unwrap_or("");
                    !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
                })
            })
            .with_message("invalid email"),
        )
    }

    /// Minimum numeric value refinement
    pub fn min(self, min: f64) -> Schema {
        self.refine_with(
            Refinement::new(move |v| v.as_f64().map_or(false, |n| n >= min))
                .with_message(format!("must be greater than or equal to {}", min)),
        )
    }

    /// Maximum numeric value refinement
    pub fn max(self, max: f64) -> Schema {
        self.refine_with(
            Refinement::new(move |v| v.as_f64().map_or(false, |n| n <= max))
                .with_message(format!("must be less than or equal to {}", max)),
        )
    }

    /// Integer refinement
    pub fn int(self) -> Schema {
        self.refine_with(
            Refinement::new(|v| v.as_f64().map_or(false, |n| n.fract() == 0.0 && n.is_finite()))
                .with_message("expected an integer"),
        )
    }

    /// Declare unknown keys a parse error. No effect on non-object schemas.
    pub fn strict(self) -> Schema {
        self.with_unknown_keys(UnknownKeys::Strict)
    }

    /// Declare unknown keys kept as-is. No effect on non-object schemas.
    pub fn passthrough(self) -> Schema {
        self.with_unknown_keys(UnknownKeys::Passthrough)
    }

    /// Reset unknown-keys handling to the default strip mode. No effect on
    /// non-object schemas.
    pub fn strip(self) -> Schema {
        self.with_unknown_keys(UnknownKeys::Strip)
    }

    fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Schema {
        if let SchemaKind::Object(object) = &mut self.kind {
            object.unknown_keys = unknown_keys;
        }
        self
    }

    /// Attach or merge field-level model options onto this node. Merging is
    /// shallow; keys of later calls win.
    pub fn with_field_options(mut self, options: FieldOptions) -> Schema {
        self.field_options = Some(match self.field_options.take() {
            Some(existing) => existing.overlay(&options),
            None => options,
        });
        self
    }

    /// Attach or merge schema-level model options onto this node
    pub fn with_schema_options(mut self, options: SchemaOptions) -> Schema {
        self.schema_options = Some(match self.schema_options.take() {
            Some(existing) => existing.overlay(&options),
            None => options,
        });
        self
    }

    /// Merge another object schema's members into this one. Members of
    /// `other` win on name collision; `other`'s schema-level options overlay
    /// this schema's. No effect unless both sides are objects.
    pub fn extend(mut self, other: Schema) -> Schema {
        let Schema {
            kind: other_kind,
            schema_options: other_schema_options,
            ..
        } = other;
        if let (SchemaKind::Object(object), SchemaKind::Object(other_object)) =
            (&mut self.kind, other_kind)
        {
            for (name, member) in other_object.shape {
                object.shape.insert(name, member);
            }
            if let Some(options) = other_schema_options {
                self.schema_options = Some(match self.schema_options.take() {
                    Some(existing) => existing.overlay(&options),
                    None => options,
                });
            }
        }
        self
    }

    /// Annotate an object schema as a model root. See [`annotate_as_root`].
    pub fn into_annotated(self, metadata: ModelMetadata) -> TranslationResult<Schema> {
        annotate_as_root(self, metadata)
    }
}

/// Pair an object schema with model metadata, producing the wrapper node
/// the translation entry point requires at the root. The inner node is
/// moved, not mutated; annotating a non-object schema is an error.
pub fn annotate_as_root(schema: Schema, metadata: ModelMetadata) -> TranslationResult<Schema> {
    if !matches!(schema.kind(), SchemaKind::Object(_)) {
        return Err(TranslationError::other(
            "model metadata annotation requires an object schema",
        ));
    }
    Ok(Schema::from_kind(SchemaKind::Annotated {
        inner: Box::new(schema),
        metadata,
    }))
}
