//! Field assembly and recursion driver
//!
//! The top-level translation walk. For each member of an object schema it
//! unwraps the member, resolves requiredness and the merged option bag, maps
//! the core node to a field-type token (or recurses into a sub-schema for
//! object cores), re-applies array wrapping, and registers the field with
//! its validation bridge.
//!
//! Pure tree recursion with no retry: the first inconsistency aborts the
//! whole call and no partial schema is returned.

use crate::error::{TranslationError, TranslationResult};
use crate::model::{
    DefaultSpec, FieldEntry, FieldOptions, FieldType, Getter, ModelSchema, PluginSet,
    RequiredSpec, SchemaOptions, StrictMode,
};
use crate::schema::{ObjectSchema, Schema, SchemaKind, UnknownKeys};

use super::bridge::bridge_validator;
use super::map_type::map_field_type;
use super::unwrap::{unwrap_schema, SchemaFeatures, UnwrapOptions};
use super::{TranslateOptions, UnknownKeysHandling};

struct Context<'a> {
    options: &'a TranslateOptions,
    /// Discriminator/type key inherited from the root schema options
    type_key: Option<String>,
}

/// Resolve the effective unknown-keys strictness of one (sub-)schema.
///
/// An explicit strict/passthrough declaration on the object always wins,
/// except under plain `Strip` handling, which ignores declarations.
fn resolve_strict(
    declared: Option<UnknownKeys>,
    handling: UnknownKeysHandling,
    is_root: bool,
) -> StrictMode {
    match handling {
        UnknownKeysHandling::Strip => StrictMode::Strip,
        UnknownKeysHandling::Throw => match declared {
            Some(UnknownKeys::Passthrough) => StrictMode::Off,
            _ => StrictMode::Throw,
        },
        UnknownKeysHandling::StripUnlessOverridden => match declared {
            Some(UnknownKeys::Strict) => StrictMode::Throw,
            Some(UnknownKeys::Passthrough) => StrictMode::Off,
            _ => StrictMode::Strip,
        },
        UnknownKeysHandling::StripUnlessOverriddenOrRoot => match declared {
            Some(UnknownKeys::Strict) => StrictMode::Throw,
            Some(UnknownKeys::Passthrough) => StrictMode::Off,
            _ if is_root => StrictMode::Throw,
            _ => StrictMode::Strip,
        },
    }
}

/// Translate an annotated root schema into a model schema.
pub(crate) fn assemble_root(
    root: &Schema,
    options: &TranslateOptions,
) -> TranslationResult<ModelSchema> {
    let (core, features) = unwrap_schema(root, UnwrapOptions::default());
    let metadata = features.metadata.clone().ok_or(TranslationError::InvalidRoot)?;
    if features.array.is_some() {
        return Err(TranslationError::InvalidRoot);
    }
    let SchemaKind::Object(object) = core.kind() else {
        return Err(TranslationError::InvalidRoot);
    };

    let strict = resolve_strict(features.unknown_keys, options.unknown_keys, true);
    let mut schema_options = SchemaOptions::new().with_strict(strict);
    schema_options.id = Some(false);
    if let Some(found) = &features.schema_options {
        schema_options = schema_options.overlay(found);
    }
    if let Some(annotated) = &metadata.schema_options {
        schema_options = schema_options.overlay(annotated);
    }

    let disabled = &options.disable_plugins;
    let plugins = PluginSet {
        lean_virtuals: !disabled.lean_virtuals,
        lean_defaults: !disabled.lean_defaults,
        lean_getters: !disabled.lean_getters,
    };

    let ctx = Context {
        options,
        type_key: schema_options.type_key.clone(),
    };
    let mut model = ModelSchema::with_plugins(schema_options, plugins);
    for (name, member) in object.shape() {
        let inherited = metadata.type_options.get(name).cloned();
        assemble_field(&mut model, name, member, inherited, name, &ctx)?;
    }
    Ok(model)
}

fn assemble_field(
    target: &mut ModelSchema,
    name: &str,
    schema: &Schema,
    inherited: Option<FieldOptions>,
    path: &str,
    ctx: &Context<'_>,
) -> TranslationResult<()> {
    let (core, features) = unwrap_schema(schema, UnwrapOptions::default());
    let is_required = !features.is_optional && !matches!(core.kind(), SchemaKind::Null);
    let is_array = features.array.is_some();
    let is_object = matches!(core.kind(), SchemaKind::Object(_));

    // Author-supplied options: node-attached first, parent-annotation keys win
    let mut user = features.field_options.clone().unwrap_or_default();
    if let Some(inherited) = &inherited {
        user = user.overlay(inherited);
    }

    if user.mz_validate.is_some() && user.validate.is_some() {
        return Err(TranslationError::DuplicateOption {
            path: path.into(),
            mz_name: "mz_validate",
            plain_name: "validate",
        });
    }
    if user.mz_required.is_some() && user.required.is_some() {
        return Err(TranslationError::DuplicateOption {
            path: path.into(),
            mz_name: "mz_required",
            plain_name: "required",
        });
    }
    if let Some(mz) = user.mz_validate.take() {
        user.validate = Some(mz);
    }
    if let Some(mz) = user.mz_required.take() {
        user.required = Some(mz);
    }

    let mut common = FieldOptions::new().with_required(RequiredSpec::flag(is_required));
    common.default = match &features.default {
        Some(value) => Some(DefaultSpec::Set(value.clone())),
        // Containers get an explicit no-default so one default instance is
        // never shared across documents
        None if is_array || is_object => Some(DefaultSpec::Unset),
        None => None,
    };
    if is_array {
        common.cast_non_arrays = Some(false);
    }
    let mut options = common.overlay(&user);

    if let Some(spec) = &options.required {
        match spec.as_flag() {
            Some(flag) if flag != is_required => {
                return Err(TranslationError::RequiredConflict { path: path.into() });
            }
            // Conditional requiredness contradicts an unconditionally
            // required schema
            None if is_required => {
                return Err(TranslationError::RequiredConflict { path: path.into() });
            }
            _ => {}
        }
    }

    let strict = resolve_strict(features.unknown_keys, ctx.options.unknown_keys, false);
    let inner_type = if is_object {
        let SchemaKind::Object(object) = core.kind() else {
            unreachable!();
        };
        let child = assemble_subdocument(object, &features, &options, path, ctx, strict)?;
        FieldType::Subdocument(Box::new(child))
    } else {
        map_field_type(&core, &features, path)?
    };
    let field_type = match &features.array {
        Some(array) => inner_type.wrap_in_arrays(array.wrap_in_array_times),
        None => inner_type,
    };

    // Binary fields read back through the model layer's wrapper; unwrap on
    // read unless the author installed their own getter
    if matches!(field_type.innermost(), FieldType::Buffer) && options.get.is_none() {
        options.get = Some(Getter::UnwrapBinary);
    }

    let bridge_schema = match &features.array {
        Some(array) => array.original_array_schema.clone(),
        None => schema.clone(),
    };

    let mut entry = FieldEntry::new(field_type, options);
    if let Some(author) = entry.options.validate.clone() {
        entry.add_validator(author);
    }
    entry.add_validator(bridge_validator(bridge_schema, strict));
    target.add_field(name, entry);
    Ok(())
}

fn assemble_subdocument(
    object: &ObjectSchema,
    features: &SchemaFeatures,
    field_options: &FieldOptions,
    path: &str,
    ctx: &Context<'_>,
    strict: StrictMode,
) -> TranslationResult<ModelSchema> {
    let metadata = features.metadata.clone().unwrap_or_default();

    let mut schema_options = SchemaOptions::new().with_strict(strict);
    // Sub-documents carry no identity field unless explicitly kept
    schema_options.id = Some(field_options.keep_id.unwrap_or(false));
    schema_options.type_key = ctx.type_key.clone();
    if let Some(found) = &features.schema_options {
        schema_options = schema_options.overlay(found);
    }
    if let Some(annotated) = &metadata.schema_options {
        schema_options = schema_options.overlay(annotated);
    }

    let mut child = ModelSchema::new(schema_options);
    for (name, member) in object.shape() {
        let inherited = metadata.type_options.get(name).cloned();
        let child_path = format!("{}.{}", path, name);
        assemble_field(&mut child, name, member, inherited, &child_path, ctx)?;
    }
    Ok(child)
}
