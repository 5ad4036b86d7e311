//! Runtime validation of documents against validation schemas
//!
//! `parse` checks a `serde_json::Value` against a schema and collects every
//! issue it finds, each scoped to a dotted path. It never mutates or
//! transforms the value; defaults and stripping are the model layer's job.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::model::values;

use super::node::{Effect, EnumValue, Literal, Schema, SchemaKind, UnknownKeys};

/// One parse failure, scoped to a dotted path inside the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// Dotted path; empty for the top-level value
    pub path: String,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// All failures of one parse call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub issues: Vec<ParseIssue>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse failed:")?;
        for issue in &self.issues {
            write!(f, " [{}]", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl Schema {
    /// Validate a value against this schema.
    pub fn parse(&self, value: &Value) -> Result<(), ParseError> {
        let mut issues = Vec::new();
        check(self, value, "", &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ParseError { issues })
        }
    }
}

fn push(issues: &mut Vec<ParseIssue>, path: &str, message: impl Into<String>) {
    issues.push(ParseIssue {
        path: path.to_string(),
        message: message.into(),
    });
}

fn child_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

fn check(schema: &Schema, value: &Value, path: &str, issues: &mut Vec<ParseIssue>) {
    match schema.kind() {
        SchemaKind::String => {
            if !value.is_string() {
                push(issues, path, "expected a string");
            }
        }
        SchemaKind::Number => {
            if !value.is_number() {
                push(issues, path, "expected a number");
            }
        }
        SchemaKind::Boolean => {
            if !value.is_boolean() {
                push(issues, path, "expected a boolean");
            }
        }
        SchemaKind::Date => {
            if !values::is_date(value) {
                push(issues, path, "expected a date");
            }
        }
        SchemaKind::Literal(literal) => {
            if !literal_matches(literal, value) {
                push(issues, path, "expected the literal value");
            }
        }
        SchemaKind::Enum(options) => match value.as_str() {
            Some(text) if options.iter().any(|o| o == text) => {}
            _ => push(issues, path, "expected one of the enum values"),
        },
        SchemaKind::NativeEnum(members) => {
            let matched = members.iter().any(|(_, member)| match member {
                EnumValue::Number(n) => value.as_f64() == Some(*n),
                EnumValue::String(s) => value.as_str() == Some(s),
            });
            if !matched {
                push(issues, path, "expected one of the enum values");
            }
        }
        SchemaKind::Null => {
            if !value.is_null() {
                push(issues, path, "expected null");
            }
        }
        SchemaKind::Nan => {
            // JSON cannot carry NaN
            push(issues, path, "expected nan");
        }
        SchemaKind::Object(object) => match value.as_object() {
            Some(map) => {
                if object.unknown_keys() == UnknownKeys::Strict {
                    for key in map.keys() {
                        if object.member(key).is_none() {
                            push(issues, &child_path(path, key), "unrecognized key");
                        }
                    }
                }
                for (name, member) in object.shape() {
                    match map.get(name) {
                        Some(entry) => check(member, entry, &child_path(path, name), issues),
                        None => {
                            if !member.accepts_missing() {
                                push(issues, &child_path(path, name), "required");
                            }
                        }
                    }
                }
            }
            None => push(issues, path, "expected an object"),
        },
        SchemaKind::Union(variants) | SchemaKind::DiscriminatedUnion { variants, .. } => {
            let matched = variants.iter().any(|variant| variant.parse(value).is_ok());
            if !matched {
                push(issues, path, "no union variant matched");
            }
        }
        SchemaKind::Map { key, value: value_schema } => match value.as_object() {
            Some(map) => {
                for (k, entry) in map {
                    if let Some(key_schema) = key {
                        check(key_schema, &Value::String(k.clone()), &child_path(path, k), issues);
                    }
                    if let Some(vs) = value_schema {
                        check(vs, entry, &child_path(path, k), issues);
                    }
                }
            }
            None => push(issues, path, "expected an object"),
        },
        SchemaKind::Record { value: value_schema } => match value.as_object() {
            Some(map) => {
                for (k, entry) in map {
                    check(value_schema, entry, &child_path(path, k), issues);
                }
            }
            None => push(issues, path, "expected an object"),
        },
        SchemaKind::Tuple(items) => match value.as_array() {
            Some(entries) if entries.len() == items.len() => {
                for (i, (item_schema, entry)) in items.iter().zip(entries).enumerate() {
                    check(item_schema, entry, &child_path(path, &i.to_string()), issues);
                }
            }
            Some(entries) => push(
                issues,
                path,
                format!("expected {} element(s), got {}", items.len(), entries.len()),
            ),
            None => push(issues, path, "expected an array"),
        },
        SchemaKind::Intersection(left, right) => {
            check(left, value, path, issues);
            check(right, value, path, issues);
        }
        SchemaKind::Any { .. } | SchemaKind::Unknown => {}
        SchemaKind::Optional(inner) => check(inner, value, path, issues),
        SchemaKind::Nullable(inner) => {
            if !value.is_null() {
                check(inner, value, path, issues);
            }
        }
        SchemaKind::Default { inner, .. } => check(inner, value, path, issues),
        SchemaKind::Branded(inner) | SchemaKind::Annotated { inner, .. } => {
            check(inner, value, path, issues)
        }
        SchemaKind::Effects { inner, effect } => {
            let before = issues.len();
            check(inner, value, path, issues);
            if issues.len() == before {
                if let Effect::Refinement(refinement) = effect {
                    if !(refinement.check)(value) {
                        let message = refinement
                            .message
                            .clone()
                            .unwrap_or_else(|| "refinement failed".to_string());
                        push(issues, path, message);
                    }
                }
            }
        }
        SchemaKind::Array(element) => match value.as_array() {
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    check(element, entry, &child_path(path, &i.to_string()), issues);
                }
            }
            None => push(issues, path, "expected an array"),
        },
        SchemaKind::Undefined | SchemaKind::Void => {
            if !value.is_null() {
                push(issues, path, "expected no value");
            }
        }
        SchemaKind::BigInt => {
            if value.as_i64().is_none() {
                push(issues, path, "expected an integer");
            }
        }
        SchemaKind::Never => push(issues, path, "no value is accepted"),
        SchemaKind::Set(element) => match value.as_array() {
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    check(element, entry, &child_path(path, &i.to_string()), issues);
                }
            }
            None => push(issues, path, "expected an array"),
        },
        SchemaKind::Promise(_) | SchemaKind::Function | SchemaKind::Lazy => {
            push(issues, path, "cannot validate this schema at runtime");
        }
    }
}

fn literal_matches(literal: &Literal, value: &Value) -> bool {
    match literal {
        Literal::Bool(b) => value.as_bool() == Some(*b),
        Literal::Number(n) => value.as_f64() == Some(*n),
        Literal::String(s) => value.as_str() == Some(s),
        Literal::Null => value.is_null(),
        Literal::Undefined => false,
        Literal::BigInt(n) => value.as_i64() == Some(*n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build::*;
    use crate::schema::node::Literal;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert!(string().parse(&json!("x")).is_ok());
        assert!(string().parse(&json!(1)).is_err());
        assert!(number().parse(&json!(1.5)).is_ok());
        assert!(boolean().parse(&json!(true)).is_ok());
        assert!(date().parse(&json!("2024-01-15T10:30:00Z")).is_ok());
        assert!(date().parse(&json!("nope")).is_err());
    }

    #[test]
    fn test_object_required_and_optional_members() {
        let schema = object(vec![("a", number()), ("b", string().optional())]);
        assert!(schema.parse(&json!({"a": 1})).is_ok());
        let err = schema.parse(&json!({})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "a");
    }

    #[test]
    fn test_object_strict_rejects_unknown_keys() {
        let lax = object(vec![("a", number())]);
        let strict = object(vec![("a", number())]).strict();

        assert!(lax.parse(&json!({"a": 1, "b": 2})).is_ok());
        let err = strict.parse(&json!({"a": 1, "b": 2})).unwrap_err();
        assert_eq!(err.issues[0].path, "b");
    }

    #[test]
    fn test_default_member_may_be_absent() {
        let schema = object(vec![("a", number().default_value(json!(5)))]);
        assert!(schema.parse(&json!({})).is_ok());
    }

    #[test]
    fn test_nullable_accepts_null() {
        let schema = string().nullable();
        assert!(schema.parse(&json!(null)).is_ok());
        assert!(schema.parse(&json!("x")).is_ok());
        assert!(schema.parse(&json!(2)).is_err());
    }

    #[test]
    fn test_refinement_message() {
        let schema = string().min_length(6);
        let err = schema.parse(&json!("short")).unwrap_err();
        assert!(err.issues[0].message.contains("at least 6"));
    }

    #[test]
    fn test_refinement_skipped_when_inner_fails() {
        let schema = string().min_length(6);
        let err = schema.parse(&json!(3)).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].message, "expected a string");
    }

    #[test]
    fn test_union_and_literal() {
        let schema = union(vec![
            literal(Literal::String("a".into())),
            literal(Literal::Number(1.0)),
        ]);
        assert!(schema.parse(&json!("a")).is_ok());
        assert!(schema.parse(&json!(1)).is_ok());
        assert!(schema.parse(&json!("b")).is_err());
    }

    #[test]
    fn test_array_paths() {
        let schema = number().array();
        let err = schema.parse(&json!([1, "x", 3])).unwrap_err();
        assert_eq!(err.issues[0].path, "1");
    }

    #[test]
    fn test_nested_paths_are_dotted() {
        let schema = object(vec![("user", object(vec![("name", string())]))]);
        let err = schema.parse(&json!({"user": {"name": 1}})).unwrap_err();
        assert_eq!(err.issues[0].path, "user.name");
    }

    #[test]
    fn test_tuple_arity() {
        let schema = tuple(vec![string(), number()]);
        assert!(schema.parse(&json!(["a", 1])).is_ok());
        assert!(schema.parse(&json!(["a"])).is_err());
    }

    #[test]
    fn test_never_rejects() {
        assert!(never().parse(&json!(null)).is_err());
    }

    #[test]
    fn test_record_values() {
        let schema = record(number());
        assert!(schema.parse(&json!({"a": 1, "b": 2})).is_ok());
        assert!(schema.parse(&json!({"a": "x"})).is_err());
    }
}
