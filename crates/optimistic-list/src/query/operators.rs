//! Comparison primitives for the query simulator.

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::{Item, KEY_FIELD};

use super::types::QueryBound;

// ============================================================================
// Value Comparison
// ============================================================================

/// Compare two JSON values for ordering.
///
/// - Both Null → Equal
/// - a is Null → Less (missing values sort first)
/// - b is Null → Greater
/// - Both numbers → f64 comparison (NaN treated as Equal)
/// - Both strings → lexicographic on the lowercased text
/// - Both booleans → false < true
/// - Cross-type → type rank: bool(0), number(1), string(2), other(3)
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(na), Value::Number(nb)) => {
            let fa = na.as_f64().unwrap_or(f64::NAN);
            let fb = nb.as_f64().unwrap_or(f64::NAN);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (Value::String(sa), Value::String(sb)) => sa.to_lowercase().cmp(&sb.to_lowercase()),
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        _ => 3,
    }
}

/// Compare two items on the named attribute (see [`Item::field`]).
pub fn compare_items(a: &Item, b: &Item, field: &str) -> Ordering {
    let va = a.field(field).unwrap_or(Value::Null);
    let vb = b.field(field).unwrap_or(Value::Null);
    compare_values(&va, &vb)
}

// ============================================================================
// Bound matching
// ============================================================================

/// Strict equality of the item's attribute with the bound.
///
/// No attribute (`field == None`, or the item lacks it) never matches.
/// A bound carrying a key additionally requires the item key to match.
pub fn matches_bound(item: &Item, field: Option<&str>, bound: &QueryBound) -> bool {
    let Some(field) = field else {
        return false;
    };
    let value_matches = item.field(field).is_some_and(|v| v == bound.value);
    let key_matches = match &bound.key {
        Some(key) => field == KEY_FIELD || item.key == *key,
        None => true,
    };
    value_matches && key_matches
}
