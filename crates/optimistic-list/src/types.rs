//! Core data types: mirrored items and pending mutations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name under which an item's key is exposed.
pub const KEY_FIELD: &str = "$key";

/// Attribute name under which a primitive payload is exposed.
pub const VALUE_FIELD: &str = "$value";

// ============================================================================
// Item
// ============================================================================

/// A mirrored entry: an arbitrary JSON payload identified by a stable key.
///
/// Identity is the key alone; two items with the same key are the same
/// entry regardless of payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: String,
    pub value: Value,
}

impl Item {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Look up a named attribute the way a query sees it.
    ///
    /// - `$key` is always the item key.
    /// - `$value` is the payload itself when it is not an object, otherwise
    ///   the payload's own `$value` field (if any).
    /// - Any other name is a field of an object payload.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == KEY_FIELD {
            return Some(Value::String(self.key.clone()));
        }
        match &self.value {
            Value::Object(obj) => obj.get(name).cloned(),
            Value::Null => None,
            primitive if name == VALUE_FIELD => Some(primitive.clone()),
            _ => None,
        }
    }

    /// Unwrapped JSON form: object payloads gain a `$key` attribute,
    /// primitives become `{ "$value": v, "$key": k }`.
    pub fn to_json(&self) -> Value {
        let mut obj = match &self.value {
            Value::Object(obj) => obj.clone(),
            Value::Null => Map::new(),
            primitive => {
                let mut m = Map::new();
                m.insert(VALUE_FIELD.to_string(), primitive.clone());
                m
            }
        };
        obj.insert(KEY_FIELD.to_string(), Value::String(self.key.clone()));
        Value::Object(obj)
    }

    /// Inverse of [`Item::to_json`]. Returns `None` when `$key` is missing or
    /// not a string.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let key = obj.get(KEY_FIELD)?.as_str()?.to_string();
        let mut rest = obj.clone();
        rest.remove(KEY_FIELD);
        let payload = match (rest.len(), rest.get(VALUE_FIELD)) {
            (1, Some(v)) if !v.is_object() => v.clone(),
            _ => Value::Object(rest),
        };
        Some(Self::new(key, payload))
    }
}

/// Authoritative collection value: `None` when the remote list is empty.
pub type Snapshot = Option<Vec<Item>>;

/// Parse a remote snapshot.
///
/// Accepts `null`, an object keyed by child key (`{ "k1": {...} }`, in the
/// object's iteration order), or an array of unwrapped items carrying
/// `$key`. Array entries without a key are skipped.
pub fn snapshot_from_json(value: &Value) -> Snapshot {
    match value {
        Value::Null => None,
        Value::Object(children) => Some(
            children
                .iter()
                .map(|(key, child)| Item::new(key.clone(), child.clone()))
                .collect(),
        ),
        Value::Array(entries) => Some(entries.iter().filter_map(Item::from_json).collect()),
        _ => Some(Vec::new()),
    }
}

// ============================================================================
// Pending operations
// ============================================================================

/// The kind of mutation applied to the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMethod {
    Insert,
    Update,
    Delete,
}

/// A mutation recorded while the mirror is unloaded.
///
/// `value` is an owned copy taken when the operation was recorded, so
/// later changes to the caller's payload do not reach the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub method: WriteMethod,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl PendingOperation {
    pub fn new(method: WriteMethod, value: &Value, key: Option<&str>) -> Self {
        Self {
            method,
            value: value.clone(),
            key: key.map(str::to_string),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
