//! Opaque-class schemas
//!
//! `instance_of` builds a schema that validates "is an instance of this
//! class" at parse time and maps to the class's model field type at
//! translation time. Buffer, ObjectId, Decimal128 and Uuid are built in;
//! further classes can be registered by name.
//!
//! The registry is written at schema-authoring time and only read during
//! translation. Registering classes concurrently with a running
//! translation is the caller's responsibility to avoid.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;

use crate::model::values;

use super::node::{OpaqueClass, Refinement, Schema, SchemaKind};

/// Instance predicate for a caller-registered class
pub type InstanceCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

struct ExternalClass {
    is_instance: InstanceCheck,
}

fn registry() -> &'static RwLock<BTreeMap<String, ExternalClass>> {
    static REGISTRY: OnceLock<RwLock<BTreeMap<String, ExternalClass>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Register a class under `name`, making `OpaqueClass::External(name)`
/// usable with [`instance_of`]. Re-registering a name replaces the earlier
/// predicate.
pub fn register_external_class(
    name: impl Into<String>,
    is_instance: impl Fn(&Value) -> bool + Send + Sync + 'static,
) {
    let mut classes = registry().write().unwrap_or_else(|e| e.into_inner());
    classes.insert(
        name.into(),
        ExternalClass {
            is_instance: Arc::new(is_instance),
        },
    );
}

/// Whether a class is registered under `name`
pub fn is_external_class_registered(name: &str) -> bool {
    let classes = registry().read().unwrap_or_else(|e| e.into_inner());
    classes.contains_key(name)
}

fn external_check(name: &str) -> Option<InstanceCheck> {
    let classes = registry().read().unwrap_or_else(|e| e.into_inner());
    classes.get(name).map(|class| class.is_instance.clone())
}

/// Build a schema validating instance-ship of an opaque class.
///
/// The returned node is a refinement wrapper around an any-typed node
/// carrying the class association, so unwrapping strips the refinement and
/// the mapping policy still sees the class.
pub fn instance_of(class: OpaqueClass, message: Option<String>) -> Schema {
    let message =
        message.unwrap_or_else(|| format!("expected an instance of {}", class.name()));
    let check: InstanceCheck = match &class {
        OpaqueClass::Buffer => Arc::new(|v: &Value| values::is_binary(v) || values::is_internal_binary(v)),
        OpaqueClass::ObjectId => Arc::new(values::is_object_id),
        OpaqueClass::Decimal128 => Arc::new(values::is_decimal128),
        OpaqueClass::Uuid => Arc::new(values::is_uuid),
        OpaqueClass::External(name) => match external_check(name) {
            Some(check) => check,
            // Unregistered name: nothing can be an instance
            None => Arc::new(|_: &Value| false),
        },
    };

    let inner = Schema::from_kind(SchemaKind::Any { class: Some(class) });
    inner.refine_with(
        Refinement::new(move |v| check(v)).with_message(message),
    )
}
