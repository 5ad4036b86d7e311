//! Timestamp field generation
//!
//! Builds an object-schema fragment declaring bookkeeping timestamp fields
//! together with the matching schema-level timestamps configuration. Merge
//! the fragment into a root schema with [`Schema::extend`].

use crate::error::{TranslationError, TranslationResult};
use crate::model::{DefaultValue, FieldOptions, SchemaOptions, Timestamps};
use crate::schema::build::{date, object};
use crate::schema::Schema;

/// Generate timestamp fields. A `None` name omits that field entirely, so
/// the fragment may declare zero, one, or two fields. Identical names for
/// both fields are an error.
pub fn gen_timestamps_schema(
    created_at: Option<&str>,
    updated_at: Option<&str>,
) -> TranslationResult<Schema> {
    if let (Some(created), Some(updated)) = (created_at, updated_at) {
        if created == updated {
            return Err(TranslationError::DuplicateTimestampFields);
        }
    }

    let mut members: Vec<(String, Schema)> = Vec::new();
    if let Some(name) = created_at {
        members.push((
            name.to_string(),
            date().default_value(DefaultValue::Now).with_field_options(
                FieldOptions::new().with_immutable(true).with_index(true),
            ),
        ));
    }
    if let Some(name) = updated_at {
        members.push((
            name.to_string(),
            date()
                .default_value(DefaultValue::Now)
                .with_field_options(FieldOptions::new().with_index(true)),
        ));
    }

    let timestamps = Timestamps {
        created_at: created_at.map(String::from),
        updated_at: updated_at.map(String::from),
    };
    Ok(object(members)
        .with_schema_options(SchemaOptions::new().with_timestamps(timestamps)))
}
