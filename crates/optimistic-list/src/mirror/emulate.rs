//! Local emulation of a single remote mutation against the mirror.

use serde_json::Value;

use crate::types::{Item, PendingOperation, WriteMethod};

/// Apply one mutation to `items` in place.
///
/// - `Insert` / `Update`: replace the item with the same key where it
///   stands, or append it. Replaying the same insert twice leaves one item
///   at the position of the first.
/// - `Delete` without a key clears the mirror; with a key it removes the
///   matching item, or does nothing if there is none.
///
/// Returns `false` only when an insert or update arrives without a key,
/// which cannot be placed in a keyed mirror.
pub fn apply_operation(
    items: &mut Vec<Item>,
    method: WriteMethod,
    value: Value,
    key: Option<&str>,
) -> bool {
    match method {
        WriteMethod::Insert | WriteMethod::Update => {
            let Some(key) = key else {
                tracing::warn!(?method, "keyless write cannot be emulated");
                return false;
            };
            upsert(items, Item::new(key, value));
            true
        }
        WriteMethod::Delete => {
            match key {
                None => items.clear(),
                Some(key) => {
                    if let Some(pos) = items.iter().position(|item| item.key == key) {
                        items.remove(pos);
                    }
                }
            }
            true
        }
    }
}

/// [`apply_operation`] for a queued [`PendingOperation`].
pub fn apply_pending(items: &mut Vec<Item>, op: PendingOperation) -> bool {
    apply_operation(items, op.method, op.value, op.key.as_deref())
}

fn upsert(items: &mut Vec<Item>, item: Item) {
    match items.iter_mut().find(|existing| existing.key == item.key) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}
