//! Translation Error Types
//!
//! Every inconsistency detected during translation is fatal to the current
//! call: the walk aborts on the first error and no partial schema is
//! returned.

use thiserror::Error;

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Translation errors
#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    /// A schema variant the model layer has no mapping for
    #[error("Path `{path}`: {type_name} type is not supported{}", remark_suffix(.remark))]
    UnsupportedType {
        /// Dotted field path
        path: String,
        /// Variant name of the rejected schema node
        type_name: &'static str,
        /// Optional clarifying remark
        remark: Option<&'static str>,
    },

    /// The root node did not unwrap to an annotated object schema
    #[error("Root schema must be an annotated object schema")]
    InvalidRoot,

    /// Contradictory required/optional settings on one field
    #[error("Path `{path}`: `required` option conflicts with the schema's optionality")]
    RequiredConflict {
        /// Dotted field path
        path: String,
    },

    /// Both the mz-prefixed and the plain form of an option were set
    #[error("Path `{path}`: can't have both `{mz_name}` and `{plain_name}` set")]
    DuplicateOption {
        /// Dotted field path
        path: String,
        /// The mz-prefixed option name
        mz_name: &'static str,
        /// The plain option name
        plain_name: &'static str,
    },

    /// Timestamp generator received the same name for both fields
    #[error("`created at` and `updated at` fields must be different")]
    DuplicateTimestampFields,

    /// Any other translation inconsistency
    #[error("{0}")]
    Other(String),
}

impl TranslationError {
    /// Create an unsupported-type error for the given field path
    pub fn unsupported(path: impl Into<String>, type_name: &'static str) -> Self {
        Self::UnsupportedType {
            path: path.into(),
            type_name,
            remark: None,
        }
    }

    /// Create an unsupported-type error with a clarifying remark
    pub fn unsupported_with_remark(
        path: impl Into<String>,
        type_name: &'static str,
        remark: &'static str,
    ) -> Self {
        Self::UnsupportedType {
            path: path.into(),
            type_name,
            remark: Some(remark),
        }
    }

    /// Create a generic translation error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

fn remark_suffix(remark: &Option<&'static str>) -> String {
    match remark {
        Some(r) => format!(" ({})", r),
        None => String::new(),
    }
}
