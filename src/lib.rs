//! schemabind - A strict, deterministic schema translator
//!
//! One schema definition drives both runtime validation and document-model
//! field typing. A validation schema built from composable combinators is
//! annotated with model metadata and translated into a model schema: field
//! types, requiredness, defaults, indexes, nested sub-schemas, and a
//! validation bridge that re-runs the full original schema on every write.
//!
//! ```
//! use schemabind::schema::build::{annotate_as_root, number, object, string};
//! use schemabind::schema::ModelMetadata;
//! use schemabind::translate::to_model_schema;
//!
//! let root = annotate_as_root(
//!     object(vec![
//!         ("name", string()),
//!         ("age", number().int().optional()),
//!     ]),
//!     ModelMetadata::new(),
//! )
//! .unwrap();
//!
//! let model = to_model_schema(&root).unwrap();
//! assert!(model.field("name").is_some());
//! ```

pub mod error;
pub mod model;
pub mod schema;
pub mod setup;
pub mod timestamps;
pub mod translate;

pub use error::{TranslationError, TranslationResult};
pub use model::ModelSchema;
pub use schema::Schema;
pub use translate::{to_model_schema, to_model_schema_with, TranslateOptions};
